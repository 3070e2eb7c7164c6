//! HTTP method as a typed enum.
//!
//! Covers the RFC 9110 standard methods. Unknown method strings are rejected
//! at the server boundary with `405 Method Not Allowed` before they ever
//! reach the router.

use std::fmt;
use std::str::FromStr;

/// A known HTTP method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Trace => "TRACE",
        }
    }
}

/// Parses an uppercase method string (e.g. `"GET"`). Case-sensitive per RFC 9110 §9.1.
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" => Ok(Self::Connect),
            "DELETE" => Ok(Self::Delete),
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "PATCH" => Ok(Self::Patch),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "TRACE" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which methods a route entry answers to.
///
/// Exact routes carry the verb they were registered under, or `Any` via
/// `Router::all`. Prefix entries — middleware, prefix handlers, and mounts —
/// are always `Any`; no registration entry point lets them carry anything
/// else.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum MethodFilter {
    Any,
    Only(Method),
}

impl MethodFilter {
    pub(crate) fn accepts(self, method: Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(m) => m == method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_representation_round_trips() {
        for method in [
            Method::Connect,
            Method::Delete,
            Method::Get,
            Method::Head,
            Method::Options,
            Method::Patch,
            Method::Post,
            Method::Put,
            Method::Trace,
        ] {
            assert_eq!(method.as_str().parse(), Ok(method));
        }
    }

    #[test]
    fn unknown_and_lowercase_methods_are_rejected() {
        assert_eq!("BREW".parse::<Method>(), Err(()));
        assert_eq!("get".parse::<Method>(), Err(()));
    }

    #[test]
    fn filter_accepts() {
        assert!(MethodFilter::Any.accepts(Method::Trace));
        assert!(MethodFilter::Only(Method::Get).accepts(Method::Get));
        assert!(!MethodFilter::Only(Method::Get).accepts(Method::Post));
    }
}
