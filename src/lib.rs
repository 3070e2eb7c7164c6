//! # corso
//!
//! An Express-style request router and middleware chain for Rust services.
//!
//! ## The contract
//!
//! corso resolves a method + path to a handler, binds `:name` path
//! parameters, and drives prefix-scoped middleware with explicit `next`
//! semantics. Everything else — TLS, rate limiting, body and query
//! decoding, template rendering — belongs to the proxy in front of you or
//! the decoder you bring.
//!
//! The routing table is built once, before serving, and never mutates
//! afterwards:
//!
//! - **Linear matching** — registration order is the only priority rule.
//!   The first route you registered that fully matches, wins. No
//!   specificity scoring, ever.
//! - **Mounting is a snapshot** — [`Router::mount`] copies the sub-router
//!   and recompiles its patterns under the prefix, there and then. Mutating
//!   the source afterwards changes nothing.
//! - **Middleware is a chain** — each step receives a [`Next`]; running it
//!   advances the chain, dropping it unused short-circuits everything
//!   deeper.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use corso::{Next, Request, Res, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = Router::new()
//!         .get("/users/:id", get_user);
//!
//!     let app = Router::new()
//!         .wrap(timing)
//!         .mount("/api", &api);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request, res: Res) {
//!     let id = req.param("id").unwrap_or("unknown");
//!     res.json(&serde_json::json!({ "id": id }));
//! }
//!
//! async fn timing(req: Request, res: Res, next: Next) {
//!     let started = std::time::Instant::now();
//!     next.run(req, res).await;
//!     tracing::info!(elapsed = ?started.elapsed(), "request served");
//! }
//! ```

mod error;
mod handler;
mod matcher;
mod method;
mod pattern;
mod request;
mod response;
mod router;
mod server;

pub mod health;
pub mod middleware;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use middleware::{Middleware, Next};
pub use request::Request;
pub use response::Res;
pub use router::Router;
pub use server::Server;

/// Re-exported from the `http` crate: the status codes handlers feed to
/// [`Res::status`] and [`Res::send_status`].
pub use http::StatusCode;
