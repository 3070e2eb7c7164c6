//! Route store, registration surface, and prefix mounting.
//!
//! A router is an ordered, append-only list of route entries. Configuration
//! is single-threaded and strictly precedes serving; [`Server::serve`]
//! wraps the finished router in an `Arc` and from that point on the table
//! is read-only, so matching needs no locking.
//!
//! [`Server::serve`]: crate::Server::serve

use crate::handler::{BoxedHandler, Handler};
use crate::method::{Method, MethodFilter};
use crate::middleware::{BoxedMiddleware, Middleware};
use crate::pattern::RoutePattern;

/// How much of the request path an entry must consume.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum MatchKind {
    /// Must consume every remaining path segment.
    Exact,
    /// Matches a leading portion; the remainder is delegated to children
    /// (mounts) or ignored (middleware and prefix handlers).
    Prefix,
}

/// What a matched entry dispatches to.
///
/// Exactly one of the three — the enum makes a payload-less or
/// doubly-populated registration unrepresentable.
#[derive(Clone)]
pub(crate) enum RoutePayload {
    Terminal(BoxedHandler),
    Continuation(BoxedMiddleware),
    Mount(Vec<RouteEntry>),
}

/// One registered route.
#[derive(Clone)]
pub(crate) struct RouteEntry {
    pub(crate) filter: MethodFilter,
    pub(crate) kind: MatchKind,
    pub(crate) pattern: RoutePattern,
    pub(crate) payload: RoutePayload,
}

/// The application router.
///
/// Matching scans entries in registration order and the first full match
/// wins: overlapping routes are disambiguated purely by the order you
/// registered them, never by apparent specificity. Each registration method
/// takes and returns `self`, so calls chain naturally.
///
/// ```rust,no_run
/// # use corso::{Request, Res, Router};
/// # async fn get_user(_: Request, _: Res) {}
/// # async fn create_user(_: Request, _: Res) {}
/// # async fn delete_user(_: Request, _: Res) {}
/// Router::new()
///     .delete("/users/:id", delete_user)
///     .get("/users/:id", get_user)
///     .post("/users", create_user);
/// ```
pub struct Router {
    pub(crate) entries: Vec<RouteEntry>,
    pub(crate) trace: bool,
}

impl Router {
    pub fn new() -> Self {
        Self { entries: Vec::new(), trace: false }
    }

    /// Emits `tracing` events as the matcher walks the table: one when a
    /// middleware joins a chain, one when a route matches.
    ///
    /// Off by default. The switch is per-router, not process-global: two
    /// routers in one process can be debugged independently.
    pub fn trace_matching(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    // ── Exact routes ──────────────────────────────────────────────────────────

    /// Registers `handler` for `GET` requests matching `pattern` exactly.
    ///
    /// Path parameters use `:name` syntax — `req.param("name")` retrieves
    /// them. `/users/:id` answers `/users/42` and nothing shorter or longer.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is malformed (as do all registration methods).
    /// Misconfiguration surfaces the moment it happens, never at request
    /// time.
    pub fn get(self, pattern: &str, handler: impl Handler) -> Self {
        self.exact(Method::Get, pattern, handler)
    }

    /// Registers `handler` for `HEAD` requests matching `pattern` exactly.
    pub fn head(self, pattern: &str, handler: impl Handler) -> Self {
        self.exact(Method::Head, pattern, handler)
    }

    /// Registers `handler` for `POST` requests matching `pattern` exactly.
    pub fn post(self, pattern: &str, handler: impl Handler) -> Self {
        self.exact(Method::Post, pattern, handler)
    }

    /// Registers `handler` for `PUT` requests matching `pattern` exactly.
    pub fn put(self, pattern: &str, handler: impl Handler) -> Self {
        self.exact(Method::Put, pattern, handler)
    }

    /// Registers `handler` for `PATCH` requests matching `pattern` exactly.
    pub fn patch(self, pattern: &str, handler: impl Handler) -> Self {
        self.exact(Method::Patch, pattern, handler)
    }

    /// Registers `handler` for `DELETE` requests matching `pattern` exactly.
    pub fn delete(self, pattern: &str, handler: impl Handler) -> Self {
        self.exact(Method::Delete, pattern, handler)
    }

    /// Registers `handler` for `CONNECT` requests matching `pattern` exactly.
    pub fn connect(self, pattern: &str, handler: impl Handler) -> Self {
        self.exact(Method::Connect, pattern, handler)
    }

    /// Registers `handler` for `OPTIONS` requests matching `pattern` exactly.
    pub fn options(self, pattern: &str, handler: impl Handler) -> Self {
        self.exact(Method::Options, pattern, handler)
    }

    /// Registers `handler` for `TRACE` requests matching `pattern` exactly.
    pub fn trace(self, pattern: &str, handler: impl Handler) -> Self {
        self.exact(Method::Trace, pattern, handler)
    }

    /// Registers `handler` for every method at an exact path.
    pub fn all(self, pattern: &str, handler: impl Handler) -> Self {
        self.push_exact(MethodFilter::Any, pattern, handler)
    }

    fn exact(self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        self.push_exact(MethodFilter::Only(method), pattern, handler)
    }

    fn push_exact(mut self, filter: MethodFilter, pattern: &str, handler: impl Handler) -> Self {
        self.entries.push(RouteEntry {
            filter,
            kind: MatchKind::Exact,
            pattern: compile_or_panic(pattern),
            payload: RoutePayload::Terminal(handler.into_boxed_handler()),
        });
        self
    }

    // ── Prefix entries ────────────────────────────────────────────────────────

    /// Registers `handler` for every method and every path under `prefix`.
    ///
    /// The prefix version of a catch-all: registered under `/static` it
    /// answers `/static`, `/static/css/app.css`, and anything deeper.
    pub fn handle_under(mut self, prefix: &str, handler: impl Handler) -> Self {
        self.entries.push(RouteEntry {
            filter: MethodFilter::Any,
            kind: MatchKind::Prefix,
            pattern: compile_or_panic(prefix),
            payload: RoutePayload::Terminal(handler.into_boxed_handler()),
        });
        self
    }

    /// Registers `handler` for anything no earlier route answered.
    ///
    /// Shorthand for [`handle_under`](Router::handle_under) at the root
    /// prefix. Registered last, it turns would-be 404s into a custom
    /// response; registered first, it would swallow every request — order
    /// is the only priority rule here too.
    pub fn fallback(self, handler: impl Handler) -> Self {
        self.handle_under("/", handler)
    }

    /// Adds a middleware that runs ahead of every route in this router.
    ///
    /// Equivalent to [`wrap_at`](Router::wrap_at) with the root prefix.
    pub fn wrap(self, middleware: impl Middleware) -> Self {
        self.wrap_at("/", middleware)
    }

    /// Adds a middleware scoped to paths under `prefix`.
    ///
    /// Middleware joins a request's chain in the order the matcher discovers
    /// it: outer mounts before inner, each in registration order, all ahead
    /// of the terminal handler. Middleware registered after a route never
    /// runs for requests that route answers.
    pub fn wrap_at(mut self, prefix: &str, middleware: impl Middleware) -> Self {
        self.entries.push(RouteEntry {
            filter: MethodFilter::Any,
            kind: MatchKind::Prefix,
            pattern: compile_or_panic(prefix),
            payload: RoutePayload::Continuation(middleware.into_boxed_middleware()),
        });
        self
    }

    /// Mounts a snapshot of `sub` under `prefix`.
    ///
    /// The snapshot is deep and eager: every pattern in `sub` — at every
    /// depth — is recompiled here and now as the concatenation of `prefix`
    /// and the child's own pattern. The mounted copy owns its structure;
    /// routes added to `sub` afterwards never affect it. Handlers themselves
    /// are shared, not copied.
    pub fn mount(mut self, prefix: &str, sub: &Router) -> Self {
        let pattern = compile_or_panic(prefix);
        let children = reroot(&pattern, &sub.entries);
        self.entries.push(RouteEntry {
            filter: MethodFilter::Any,
            kind: MatchKind::Prefix,
            pattern,
            payload: RoutePayload::Mount(children),
        });
        self
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_or_panic(pattern: &str) -> RoutePattern {
    RoutePattern::compile(pattern)
        .unwrap_or_else(|e| panic!("invalid route pattern `{pattern}`: {e}"))
}

/// Rebuilds `entries` with `prefix` prepended to every pattern, recursing
/// through nested mounts. Patterns inside a router already carry the full
/// path from that router's root, so prepending the prefix at every depth is
/// the whole recompilation.
fn reroot(prefix: &RoutePattern, entries: &[RouteEntry]) -> Vec<RouteEntry> {
    entries
        .iter()
        .map(|entry| {
            let payload = match &entry.payload {
                RoutePayload::Mount(children) => RoutePayload::Mount(reroot(prefix, children)),
                other => other.clone(),
            };
            RouteEntry {
                filter: entry.filter,
                kind: entry.kind,
                pattern: prefix.join(&entry.pattern),
                payload,
            }
        })
        .collect()
}
