//! Incoming request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::{Extensions, HeaderMap};

use crate::method::Method;

/// An incoming request, fully read and decomposed before dispatch.
///
/// The body is raw bytes and the query string is raw text: corso decodes
/// neither. Bring your own decoder — `serde_json::from_slice` for bodies,
/// a `form_urlencoded`-style parser for queries.
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    pub(crate) params: HashMap<String, String>,
    context: Extensions,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        query: Option<String>,
        headers: HeaderMap,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, path, query, headers, body, params, context: Extensions::new() }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The request path, query string and fragment excluded.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Case-insensitive header lookup; `None` for absent or non-UTF-8 values.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All bound path parameters.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Stores a request-scoped value, keyed by its type.
    ///
    /// The bag lives exactly as long as this request: middleware writes,
    /// anything deeper in the chain reads. One value per type.
    pub fn set_context<T: Clone + Send + Sync + 'static>(&mut self, value: T) {
        self.context.insert(value);
    }

    /// Reads a request-scoped value stored by
    /// [`set_context`](Request::set_context).
    pub fn context<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.context.get::<T>()
    }
}

#[cfg(test)]
impl Request {
    pub(crate) fn test(method: Method, path: &str) -> Self {
        Self::new(
            method,
            path.to_owned(),
            None,
            HeaderMap::new(),
            Bytes::new(),
            HashMap::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use http::header::HeaderValue;

    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("abc"));
        let req = Request::new(
            Method::Get,
            "/".to_owned(),
            None,
            headers,
            Bytes::new(),
            HashMap::new(),
        );

        assert_eq!(req.header("X-Request-Id"), Some("abc"));
        assert_eq!(req.header("missing"), None);
    }

    #[test]
    fn context_bag_stores_one_value_per_type() {
        #[derive(Clone, Debug, PartialEq)]
        struct Who(&'static str);

        let mut req = Request::test(Method::Get, "/");
        assert_eq!(req.context::<Who>(), None);

        req.set_context(Who("alice"));
        req.set_context(7u32);
        assert_eq!(req.context::<Who>(), Some(&Who("alice")));
        assert_eq!(req.context::<u32>(), Some(&7));

        req.set_context(Who("bob"));
        assert_eq!(req.context::<Who>(), Some(&Who("bob")));
    }
}
