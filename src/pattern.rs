//! Route-pattern compiler.
//!
//! A pattern is an ordered sequence of path segments, each either a literal
//! (`users`) or a single-segment named capture (`:id`). Patterns are compiled
//! once, at registration time — matching never re-parses the source string.
//! There are no multi-segment wildcards and no optional segments: a pattern's
//! segment count is fixed.

use std::fmt;

/// One compiled pattern segment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Segment {
    /// Matches a request segment by string equality.
    Literal(String),
    /// Matches any single request segment, binding it under the given name.
    Param(String),
}

/// A compiled route pattern.
///
/// `/` compiles to the empty sequence (root-only match). A trailing slash is
/// normalized away for every other pattern, so `/users/` and `/users`
/// compile identically.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub(crate) fn compile(pattern: &str) -> Result<Self, PatternError> {
        let Some(rest) = pattern.strip_prefix('/') else {
            return Err(PatternError::MissingLeadingSlash);
        };
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        let mut segments = Vec::new();
        if rest.is_empty() {
            return Ok(Self { segments });
        }
        for raw in rest.split('/') {
            match raw.strip_prefix(':') {
                Some("") => return Err(PatternError::EmptyParamName),
                Some(name) => segments.push(Segment::Param(name.to_owned())),
                None if raw.is_empty() => return Err(PatternError::EmptySegment),
                None => segments.push(Segment::Literal(raw.to_owned())),
            }
        }
        Ok(Self { segments })
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    /// Concatenation used by mounting: this pattern followed by the child's
    /// own segments.
    pub(crate) fn join(&self, child: &RoutePattern) -> RoutePattern {
        let mut segments = Vec::with_capacity(self.segments.len() + child.segments.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&child.segments);
        RoutePattern { segments }
    }

    /// Matches this pattern's segments from `offset` onward against the
    /// request segments at the same positions. Returns the `(name, value)`
    /// pairs bound by capture segments, or `None` on the first mismatch.
    ///
    /// Segments before `offset` were already validated by an enclosing
    /// mount, whose pattern this one extends. The request may be longer than
    /// the pattern — whether the remainder is acceptable is the caller's
    /// exact-vs-prefix decision.
    pub(crate) fn bind_from(
        &self,
        offset: usize,
        path: &[&str],
    ) -> Option<Vec<(String, String)>> {
        if path.len() < self.segments.len() {
            return None;
        }
        let mut bound = Vec::new();
        for (i, segment) in self.segments.iter().enumerate().skip(offset) {
            match segment {
                Segment::Literal(text) => {
                    if text != path[i] {
                        return None;
                    }
                }
                Segment::Param(name) => bound.push((name.clone(), path[i].to_owned())),
            }
        }
        Some(bound)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "/{text}")?,
                Segment::Param(name) => write!(f, "/:{name}")?,
            }
        }
        Ok(())
    }
}

/// A pattern rejected at registration time.
///
/// Routing never sees these: registration panics on the spot, so a
/// misconfigured router cannot start serving.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum PatternError {
    MissingLeadingSlash,
    EmptySegment,
    EmptyParamName,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLeadingSlash => f.write_str("pattern must start with `/`"),
            Self::EmptySegment => f.write_str("pattern has an empty segment"),
            Self::EmptyParamName => f.write_str("capture segment has no name after `:`"),
        }
    }
}

impl std::error::Error for PatternError {}
