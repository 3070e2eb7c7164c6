//! The matching algorithm: deterministic linear scan, first match wins.
//!
//! Entries are visited in registration order, depth-first through mounts.
//! Middleware whose prefix matches is collected along the way; the first
//! terminal entry that fully matches stops the scan and comes back with the
//! collected chain and every parameter bound en route. Overlap between two
//! patterns is resolved purely by registration order — never by apparent
//! specificity.
//!
//! Complexity is O(entries × segments) per request, over a table that is
//! small and static. Any index structure would have to preserve exact
//! first-match order; none is used.

use std::collections::HashMap;

use tracing::trace;

use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::middleware::BoxedMiddleware;
use crate::router::{MatchKind, RouteEntry, RoutePayload, Router};

/// A successful match: the middleware discovered ahead of the terminal
/// handler, the terminal handler itself, and the bound path parameters.
/// Parameter values are raw strings, no coercion.
pub(crate) struct RouteMatch {
    pub(crate) chain: Vec<BoxedMiddleware>,
    pub(crate) terminal: BoxedHandler,
    pub(crate) params: HashMap<String, String>,
}

impl Router {
    /// Resolves `method` + path segments against the routing table.
    ///
    /// `segments` is the request path split on `/` with empty segments
    /// dropped; query string and fragment never participate in matching.
    pub(crate) fn find(&self, method: Method, segments: &[&str]) -> Option<RouteMatch> {
        debug_assert!(
            segments.iter().all(|s| !s.contains('/')),
            "path must be split into segments before matching",
        );
        let scan = Scan { method, segments, trace: self.trace };
        scan.run(&self.entries, 0, Vec::new(), HashMap::new())
    }
}

struct Scan<'a> {
    method: Method,
    segments: &'a [&'a str],
    trace: bool,
}

impl Scan<'_> {
    /// Scans `entries` with the first `offset` path segments already
    /// consumed by enclosing mounts. `chain` and `params` carry what outer
    /// levels accumulated; they come back inside the match, or are discarded
    /// with the whole subtree when no terminal matches within it.
    fn run(
        &self,
        entries: &[RouteEntry],
        offset: usize,
        mut chain: Vec<BoxedMiddleware>,
        mut params: HashMap<String, String>,
    ) -> Option<RouteMatch> {
        for entry in entries {
            match &entry.payload {
                RoutePayload::Continuation(step) => {
                    if let Some(bound) = entry.pattern.bind_from(offset, self.segments) {
                        if self.trace {
                            trace!(prefix = %entry.pattern, "middleware joins the chain");
                        }
                        params.extend(bound);
                        chain.push(step.clone());
                    }
                }
                RoutePayload::Mount(children) => {
                    let Some(bound) = entry.pattern.bind_from(offset, self.segments) else {
                        continue;
                    };
                    let mut inner = params.clone();
                    inner.extend(bound);
                    let found =
                        self.run(children, entry.pattern.len(), chain.clone(), inner);
                    if found.is_some() {
                        return found;
                    }
                    // No terminal in the subtree: the mount contributes
                    // nothing, middleware collected inside it included.
                }
                RoutePayload::Terminal(handler) => {
                    if entry.kind == MatchKind::Exact {
                        if !entry.filter.accepts(self.method) {
                            continue;
                        }
                        if self.segments.len() != entry.pattern.len() {
                            continue;
                        }
                    }
                    let Some(bound) = entry.pattern.bind_from(offset, self.segments) else {
                        continue;
                    };
                    if self.trace {
                        trace!(pattern = %entry.pattern, method = %self.method, "matched");
                    }
                    params.extend(bound);
                    return Some(RouteMatch {
                        chain,
                        terminal: handler.clone(),
                        params,
                    });
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{ErasedHandler, Handler};
    use crate::middleware::Next;
    use crate::request::Request;
    use crate::response::Res;

    async fn noop(_req: Request, _res: Res) {}

    async fn passthrough(req: Request, res: Res, next: Next) {
        next.run(req, res).await;
    }

    /// A terminal handler that writes a fixed tag, so tests can tell which
    /// of several overlapping routes won.
    fn marker(tag: &'static str) -> impl Handler {
        move |_req: Request, res: Res| async move { res.send(tag) }
    }

    async fn winning_tag(matched: RouteMatch) -> String {
        let res = Res::new();
        matched
            .terminal
            .call(Request::test(Method::Get, "/"), res.clone())
            .await;
        let (_, _, body) = res.into_parts();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn first_registered_route_wins_overlap() {
        let app = Router::new()
            .get("/overlap/:x", marker("param"))
            .get("/overlap/fixed", marker("literal"));

        let matched = app.find(Method::Get, &["overlap", "fixed"]).unwrap();
        assert_eq!(matched.params["x"], "fixed");
        assert_eq!(winning_tag(matched).await, "param");
    }

    #[tokio::test]
    async fn identical_patterns_resolve_to_the_first() {
        let app = Router::new()
            .get("/same", marker("first"))
            .get("/same", marker("second"));

        let matched = app.find(Method::Get, &["same"]).unwrap();
        assert_eq!(winning_tag(matched).await, "first");
    }

    #[test]
    fn single_param_binds_and_bounds() {
        let app = Router::new().get("/a/:user", noop);

        let matched = app.find(Method::Get, &["a", "user"]).unwrap();
        assert_eq!(matched.params, HashMap::from([("user".into(), "user".into())]));

        assert!(app.find(Method::Get, &["a"]).is_none());
        assert!(app.find(Method::Get, &["a", "user", "extra"]).is_none());
    }

    #[test]
    fn two_params_bind_independently() {
        let app = Router::new()
            .get("/a/:user", noop)
            .get("/b/:user/:name", noop);

        let matched = app.find(Method::Get, &["b", "joe", "smith"]).unwrap();
        assert_eq!(matched.params["user"], "joe");
        assert_eq!(matched.params["name"], "smith");

        assert!(app.find(Method::Get, &["b", "joe"]).is_none());
        assert!(app.find(Method::Get, &["a", "joe", "extra"]).is_none());
    }

    #[test]
    fn params_interleave_with_literals() {
        let app = Router::new().get("/c/:user/noparam/:name", noop);

        let matched = app
            .find(Method::Get, &["c", "joe", "noparam", "smith"])
            .unwrap();
        assert_eq!(matched.params["user"], "joe");
        assert_eq!(matched.params["name"], "smith");

        assert!(app.find(Method::Get, &["c", "joe"]).is_none());
        assert!(app.find(Method::Get, &["c", "joe", "other", "smith"]).is_none());
        assert!(
            app.find(Method::Get, &["c", "joe", "noparam", "smith", "x"])
                .is_none()
        );
    }

    #[test]
    fn root_route_matches_only_the_root() {
        let app = Router::new().get("/", noop);

        assert!(app.find(Method::Get, &[]).is_some());
        assert!(app.find(Method::Get, &["a"]).is_none());
    }

    #[test]
    fn method_filter_is_enforced_for_exact_routes() {
        let app = Router::new()
            .get("/thing", noop)
            .all("/anything", noop);

        assert!(app.find(Method::Post, &["thing"]).is_none());
        assert!(app.find(Method::Get, &["thing"]).is_some());
        assert!(app.find(Method::Delete, &["anything"]).is_some());
        assert!(app.find(Method::Trace, &["anything"]).is_some());
    }

    #[test]
    fn mounted_router_matches_under_its_prefix() {
        let sub = Router::new().get("/sub/:id", noop);
        let app = Router::new().mount("/m", &sub);

        let matched = app.find(Method::Get, &["m", "sub", "42"]).unwrap();
        assert_eq!(matched.params["id"], "42");

        assert!(app.find(Method::Get, &["sub", "42"]).is_none());
        assert!(app.find(Method::Get, &["m", "sub"]).is_none());
    }

    #[test]
    fn mount_prefix_params_accumulate_with_child_params() {
        let sub = Router::new().get("/info/:field", noop);
        let app = Router::new().mount("/t/:tenant", &sub);

        let matched = app.find(Method::Get, &["t", "acme", "info", "plan"]).unwrap();
        assert_eq!(matched.params["tenant"], "acme");
        assert_eq!(matched.params["field"], "plan");
    }

    #[test]
    fn middleware_is_collected_in_discovery_order() {
        let app = Router::new()
            .wrap(passthrough)
            .wrap_at("/m", passthrough)
            .get("/m/x", noop)
            .get("/y", noop);

        assert_eq!(app.find(Method::Get, &["m", "x"]).unwrap().chain.len(), 2);
        // `/y` is outside the `/m` prefix; only the root middleware joins.
        assert_eq!(app.find(Method::Get, &["y"]).unwrap().chain.len(), 1);
    }

    #[test]
    fn middleware_registered_after_the_route_does_not_join() {
        let app = Router::new().get("/x", noop).wrap(passthrough);

        assert!(app.find(Method::Get, &["x"]).unwrap().chain.is_empty());
    }

    #[test]
    fn unmatched_mount_discards_its_middleware() {
        // The mounted subtree has middleware but no matching terminal; a
        // sibling registered later answers, without the subtree's chain.
        let sub = Router::new().wrap(passthrough);
        let app = Router::new().mount("/m", &sub).get("/m/x", noop);

        let matched = app.find(Method::Get, &["m", "x"]).unwrap();
        assert!(matched.chain.is_empty());
    }

    #[test]
    fn middleware_inside_a_mount_joins_after_outer_middleware() {
        let sub = Router::new().wrap(passthrough).get("/x", noop);
        let app = Router::new().wrap(passthrough).mount("/m", &sub);

        let matched = app.find(Method::Get, &["m", "x"]).unwrap();
        assert_eq!(matched.chain.len(), 2);
    }

    #[tokio::test]
    async fn fallback_answers_what_nothing_else_did() {
        let app = Router::new()
            .get("/known", marker("route"))
            .fallback(marker("fallback"));

        let matched = app.find(Method::Get, &["known"]).unwrap();
        assert_eq!(winning_tag(matched).await, "route");

        let matched = app.find(Method::Post, &["anything", "at", "all"]).unwrap();
        assert_eq!(winning_tag(matched).await, "fallback");
    }

    #[test]
    fn no_entry_matches_yields_none() {
        let app = Router::new().get("/a", noop);
        assert!(app.find(Method::Get, &["nope"]).is_none());
        assert!(Router::new().find(Method::Get, &[]).is_none());
    }
}
