//! Terminal handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The router holds handlers of *different* concrete types in one entry
//! list. Rust collections can only hold one concrete type, so handlers hide
//! behind a trait object (`dyn ErasedHandler`) with a common interface.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn hello(req: Request, res: Res) { … }     ← user writes this
//!        ↓ router.get("/", hello)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req, res)  at request time          ← one vtable dispatch
//! ```
//!
//! The only runtime cost per request is one `Arc` clone (atomic inc) plus
//! one virtual call. Mounted snapshots share the same `Arc`s: mounting
//! copies route structure, never handlers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::Res;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased handler future.
///
/// `Pin<Box<…>>` because the runtime must be able to poll the future
/// in-place; `Send + 'static` so tokio may move it across threads.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
/// External crates cannot usefully interact with this trait.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request, res: Res) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests
/// and across mounted snapshots.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid terminal handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request, res: Res)
/// ```
///
/// A terminal handler produces the response through its [`Res`] handle and
/// ends the chain. The trait is **sealed** (via the private `Sealed`
/// supertrait): only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut> private::Sealed for F
where
    F: Fn(Request, Res) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
}

/// Implement `Handler` for any function with the right signature: named
/// `async fn` items, closures returning futures, any struct implementing `Fn`.
impl<F, Fut> Handler for F
where
    F: Fn(Request, Res) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut> ErasedHandler for FnHandler<F>
where
    F: Fn(Request, Res) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn call(&self, req: Request, res: Res) -> BoxFuture {
        Box::pin((self.0)(req, res))
    }
}
