//! Built-in Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from the load-balancer. |
//!
//! Register them on your router:
//!
//! ```rust,no_run
//! use corso::{Router, health};
//!
//! let app = Router::new()
//!     .get("/healthz", health::liveness)
//!     .get("/readyz", health::readiness);
//! ```
//!
//! Replace `readiness` with your own handler if you need to gate on
//! dependency availability (database connections, downstream services).

use crate::{Request, Res};

/// Liveness probe handler.
///
/// Always answers `200 OK` with body `"ok"`. If the process can respond to
/// HTTP at all, it is alive — this handler intentionally has no
/// dependencies.
pub async fn liveness(_req: Request, res: Res) {
    res.send("ok");
}

/// Readiness probe handler (default implementation).
///
/// Answers `200 OK` with body `"ready"`. Swap in your own handler if the
/// application needs a warm-up period or must verify dependency health
/// before taking traffic.
pub async fn readiness(_req: Request, res: Res) {
    res.send("ready");
}
