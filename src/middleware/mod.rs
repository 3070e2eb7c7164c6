//! Middleware: continuation handlers and the chain executor.
//!
//! Middleware intercepts requests ahead of the terminal handler and is the
//! right place for cross-cutting concerns: structured tracing, timing,
//! request-id injection, authorization.
//!
//! Every middleware receives a [`Next`] — the explicit capability to advance
//! the rest of the chain. Code written after `next.run(..).await` executes
//! once the entire remainder (deeper middleware and the terminal handler)
//! has completed, which is how wrap-around behaviors such as timing are
//! built:
//!
//! ```text
//! async fn timing(req: Request, res: Res, next: Next) {
//!     let started = Instant::now();
//!     next.run(req, res).await;
//!     info!(elapsed = ?started.elapsed(), "request served");
//! }
//! ```
//!
//! A middleware that drops its `Next` without running it terminates the
//! chain: no deeper middleware and no terminal handler runs. That is the one
//! and only short-circuit mechanism — write your refusal through [`Res`] and
//! return.

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler};
use crate::request::Request;
use crate::response::Res;

// ── Type erasure ──────────────────────────────────────────────────────────────

/// Internal dispatch interface; same story as `handler::ErasedHandler`.
#[doc(hidden)]
pub trait ErasedMiddleware {
    fn call(&self, req: Request, res: Res, next: Next) -> BoxFuture;
}

/// A heap-allocated, type-erased middleware shared across concurrent
/// requests and across mounted snapshots.
#[doc(hidden)]
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware + Send + Sync + 'static>;

/// Implemented for every valid middleware.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request, res: Res, next: Next)
/// ```
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_middleware(self) -> BoxedMiddleware;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut> private::Sealed for F
where
    F: Fn(Request, Res, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Res, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(FnMiddleware(self))
    }
}

struct FnMiddleware<F>(F);

impl<F, Fut> ErasedMiddleware for FnMiddleware<F>
where
    F: Fn(Request, Res, Next) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn call(&self, req: Request, res: Res, next: Next) -> BoxFuture {
        Box::pin((self.0)(req, res, next))
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// The matched chain for one request: the middleware the matcher discovered
/// ahead of the terminal handler, in discovery order, plus the terminal.
pub(crate) struct Chain {
    steps: Arc<[BoxedMiddleware]>,
    terminal: BoxedHandler,
}

impl Chain {
    pub(crate) fn new(steps: Vec<BoxedMiddleware>, terminal: BoxedHandler) -> Self {
        Self { steps: steps.into(), terminal }
    }

    /// Drives the chain from its first step.
    pub(crate) async fn run(self, req: Request, res: Res) {
        let next = Next { steps: self.steps, cursor: 0, terminal: self.terminal };
        next.run(req, res).await;
    }
}

/// The advance capability handed to each middleware: the ordered step list
/// plus a cursor into it.
///
/// Running it transfers control to the following step — the next middleware,
/// or the terminal handler when none remain. Dropping it unused
/// short-circuits the chain.
pub struct Next {
    steps: Arc<[BoxedMiddleware]>,
    cursor: usize,
    terminal: BoxedHandler,
}

impl Next {
    /// Advances the chain. Resolves once every deeper step — including the
    /// terminal handler — has completed.
    pub async fn run(self, req: Request, res: Res) {
        let Next { steps, cursor, terminal } = self;
        match steps.get(cursor).cloned() {
            Some(step) => {
                let next = Next { steps, cursor: cursor + 1, terminal };
                step.call(req, res, next).await;
            }
            None => terminal.call(req, res).await,
        }
    }
}
