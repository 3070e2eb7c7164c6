//! The response sink and its first-write-wins contract.
//!
//! Handlers do not return responses; they emit through a [`Res`] handle.
//! The first emitter to finalize wins — every later write, including the
//! sink's own fault handling, is a no-op. The moment the chain completes,
//! the buffered status, headers, and body are consistent and ready for the
//! wire; a failing handler can never leave the channel half-written.

use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use tracing::error;

/// A cloneable handle to one request's response channel.
///
/// Clones are cheap and all point at the same channel, so a middleware can
/// keep a handle across `next.run(..)` while deeper steps hold their own.
#[derive(Clone)]
pub struct Res {
    inner: Arc<Mutex<ResInner>>,
}

struct ResInner {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    finalized: bool,
}

impl Res {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ResInner {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: Bytes::new(),
                finalized: false,
            })),
        }
    }

    /// Handlers run sequentially within one request's task, so the lock is
    /// uncontended; a poisoned lock means a handler panicked mid-write and
    /// the buffered state is still the best answer we have.
    fn lock(&self) -> MutexGuard<'_, ResInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sets the status code for the eventual response. No-op once finalized.
    pub fn status(&self, code: StatusCode) -> &Self {
        let mut inner = self.lock();
        if !inner.finalized {
            inner.status = code;
        }
        self
    }

    /// Appends a response header. No-op once finalized; a name or value that
    /// is not valid HTTP is dropped with an error event.
    pub fn header(&self, name: &str, value: &str) -> &Self {
        let mut inner = self.lock();
        if inner.finalized {
            return self;
        }
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                inner.headers.append(name, value);
            }
            _ => error!(name, "dropping malformed response header"),
        }
        self
    }

    /// Finalizes with a plain-text body.
    pub fn send(&self, body: impl Into<String>) {
        self.finalize(
            Some(HeaderValue::from_static("text/plain; charset=utf-8")),
            Bytes::from(body.into()),
        );
    }

    /// Finalizes with `code` and its canonical reason phrase as the body.
    pub fn send_status(&self, code: StatusCode) {
        self.status(code);
        self.send(code.canonical_reason().unwrap_or_default());
    }

    /// Serializes `value` and finalizes with an `application/json` body.
    ///
    /// A value that cannot be serialized finalizes the response as a
    /// `500 Internal Server Error` instead — the channel never dangles.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => self.finalize(
                Some(HeaderValue::from_static("application/json")),
                Bytes::from(body),
            ),
            Err(e) => {
                error!(error = %e, "response serialization failed");
                self.status(StatusCode::INTERNAL_SERVER_ERROR);
                self.send("response serialization failed");
            }
        }
    }

    /// Finalizes with an arbitrary body and content type.
    pub fn bytes(&self, content_type: &str, body: impl Into<Bytes>) {
        match HeaderValue::try_from(content_type) {
            Ok(value) => self.finalize(Some(value), body.into()),
            Err(_) => {
                error!(content_type, "malformed content type");
                self.status(StatusCode::INTERNAL_SERVER_ERROR);
                self.send("malformed content type");
            }
        }
    }

    /// Finalizes with `302 Found` and a `Location` header.
    pub fn redirect(&self, location: &str) {
        self.status(StatusCode::FOUND).header("location", location);
        self.send(format!("Found. Redirecting to {location}"));
    }

    /// Finalizes with whatever status and headers are buffered and an empty
    /// body.
    pub fn end(&self) {
        self.finalize(None, Bytes::new());
    }

    /// Whether some emitter already finalized this response.
    pub fn finalized(&self) -> bool {
        self.lock().finalized
    }

    fn finalize(&self, content_type: Option<HeaderValue>, body: Bytes) {
        let mut inner = self.lock();
        if inner.finalized {
            return;
        }
        if let Some(value) = content_type {
            if !inner.headers.contains_key(header::CONTENT_TYPE) {
                inner.headers.insert(header::CONTENT_TYPE, value);
            }
        }
        inner.body = body;
        inner.finalized = true;
    }

    /// The buffered response, handed to the transport after the chain
    /// completes. An unfinalized sink yields its current state — status and
    /// headers as set, empty body — which is still well-formed.
    pub(crate) fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        let mut inner = self.lock();
        let headers = std::mem::take(&mut inner.headers);
        let body = std::mem::take(&mut inner.body);
        (inner.status, headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("unsupported value"))
        }
    }

    #[test]
    fn first_write_wins() {
        let res = Res::new();
        res.send("first");
        res.send("second");
        res.status(StatusCode::IM_A_TEAPOT);

        let (status, _, body) = res.into_parts();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"first"));
    }

    #[test]
    fn send_status_uses_the_reason_phrase() {
        let res = Res::new();
        res.send_status(StatusCode::NOT_FOUND);

        assert!(res.finalized());
        let (status, headers, body) = res.into_parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, Bytes::from_static(b"Not Found"));
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8",
        );
    }

    #[test]
    fn json_serializes_and_sets_content_type() {
        let res = Res::new();
        res.json(&serde_json::json!({ "id": "42" }));

        let (status, headers, body) = res.into_parts();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(body, Bytes::from_static(br#"{"id":"42"}"#));
    }

    #[test]
    fn serialization_fault_finalizes_with_500() {
        let res = Res::new();
        res.json(&Unserializable);

        let (status, _, body) = res.into_parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, Bytes::from_static(b"response serialization failed"));
    }

    #[test]
    fn serialization_fault_cannot_overwrite_an_earlier_response() {
        let res = Res::new();
        res.send("already answered");
        res.json(&Unserializable);

        let (status, _, body) = res.into_parts();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"already answered"));
    }

    #[test]
    fn headers_accumulate_until_finalized() {
        let res = Res::new();
        res.header("x-one", "1").header("x-two", "2");
        res.send("ok");
        res.header("x-late", "3");

        let (_, headers, _) = res.into_parts();
        assert_eq!(headers.get("x-one").unwrap(), "1");
        assert_eq!(headers.get("x-two").unwrap(), "2");
        assert!(!headers.contains_key("x-late"));
    }

    #[test]
    fn explicit_content_type_is_not_overwritten() {
        let res = Res::new();
        res.header("content-type", "application/vnd.corso+json");
        res.json(&serde_json::json!([1, 2]));

        let (_, headers, _) = res.into_parts();
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/vnd.corso+json",
        );
    }

    #[test]
    fn redirect_sets_location_and_found() {
        let res = Res::new();
        res.redirect("/elsewhere");

        let (status, headers, _) = res.into_parts();
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(headers.get("location").unwrap(), "/elsewhere");
    }

    #[test]
    fn end_finalizes_with_an_empty_body() {
        let res = Res::new();
        res.status(StatusCode::NO_CONTENT);
        res.end();
        res.send("too late");

        let (status, _, body) = res.into_parts();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[test]
    fn unfinalized_sink_yields_its_buffered_state() {
        let res = Res::new();
        let (status, _, body) = res.into_parts();
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[test]
    fn clones_share_one_channel() {
        let res = Res::new();
        let other = res.clone();
        other.send("from the clone");

        assert!(res.finalized());
        let (_, _, body) = res.into_parts();
        assert_eq!(body, Bytes::from_static(b"from the clone"));
    }
}
