//! Route pattern matching
//!
//! Patterns and addresses are both split on `/`, keeping the leading empty
//! segment, and compared position by position in two passes:
//!
//! - forward: every requested segment against the pattern segment at the same
//!   position (missing pattern segments compare as `""`)
//! - reverse: every pattern segment against the requested segment at the same
//!   position (missing requested segments compare as `""`), collecting the
//!   values of parameter segments
//!
//! A position matches when both sides are identical, when the pattern holds a
//! required parameter `{name}` and the requested value is non-empty, or when
//! the pattern holds an optional parameter `{name?}`.

use crate::params::RouteArgs;

/// A single segment in a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must match exactly (may be empty)
    Literal(String),
    /// `{name}`: matches any non-empty value
    Required(String),
    /// `{name?}`: matches any value, including an absent one
    Optional(String),
}

impl Segment {
    /// Parse a segment from string
    ///
    /// - `"users"` -> `Literal("users")`
    /// - `"{id}"` -> `Required("id")`
    /// - `"{id?}"` -> `Optional("id")`
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(inner) => match inner.strip_suffix('?') {
                Some(name) => Segment::Optional(name.to_string()),
                None => Segment::Required(inner.to_string()),
            },
            None => Segment::Literal(raw.to_string()),
        }
    }

    /// Check a requested segment against this pattern segment.
    ///
    /// `raw` is the pattern text, used for the identity test.
    fn accepts(&self, raw: &str, requested: &str) -> Acceptance {
        if raw == requested {
            return Acceptance::Identical;
        }
        match self {
            Segment::Literal(_) => Acceptance::Rejected,
            Segment::Required(_) if requested.is_empty() => Acceptance::Rejected,
            Segment::Required(_) | Segment::Optional(_) => Acceptance::Captured,
        }
    }

    /// Parameter name, if this is a parameter segment
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Required(name) | Segment::Optional(name) => Some(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Acceptance {
    Identical,
    Captured,
    Rejected,
}

/// A compiled address pattern such as `/users/{id}/{tab?}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    parts: Vec<String>,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a pattern from its declared address
    pub fn from_path(path: &str) -> Self {
        let parts: Vec<String> = path.split('/').map(str::to_string).collect();
        let segments = parts.iter().map(|part| Segment::parse(part)).collect();

        Self {
            raw: path.to_string(),
            parts,
            segments,
        }
    }

    /// The pattern as declared
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match a normalised address against this pattern
    ///
    /// Returns the captured parameter values in pattern order.
    pub fn matches(&self, address: &str) -> Option<RouteArgs> {
        let requested: Vec<&str> = address.split('/').collect();

        // Forward scan: requested segments without a counterpart must be empty.
        for (index, value) in requested.iter().enumerate() {
            let accepted = match self.segments.get(index) {
                Some(segment) => segment.accepts(&self.parts[index], value),
                None if value.is_empty() => Acceptance::Identical,
                None => Acceptance::Rejected,
            };
            if accepted == Acceptance::Rejected {
                return None;
            }
        }

        // Reverse scan: pattern segments without a counterpart see "".
        let mut args = RouteArgs::new();
        for (index, segment) in self.segments.iter().enumerate() {
            let value = requested.get(index).copied().unwrap_or("");
            match segment.accepts(&self.parts[index], value) {
                Acceptance::Identical => {}
                Acceptance::Captured => args.push(value),
                Acceptance::Rejected => return None,
            }
        }

        Some(args)
    }
}

/// Normalise a requested address
///
/// An empty address becomes `/`; a single trailing slash is dropped unless
/// the address is the root.
pub fn normalize_address(address: &str) -> String {
    if address.is_empty() {
        return "/".to_string();
    }
    if address != "/" {
        if let Some(stripped) = address.strip_suffix('/') {
            return stripped.to_string();
        }
    }
    address.to_string()
}
