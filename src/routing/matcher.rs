//! Template segment parsing and token matching.
//!
//! # Responsibilities
//! - Classify a raw template token as static or typed-dynamic
//! - Match a runtime path token against a segment
//! - Extract the typed value for dynamic segments
//!
//! # Design Decisions
//! - Static matching is case-sensitive and byte-for-byte
//! - Dynamic segments are written `{name:type}`
//! - Segments keep their raw text; registration compares raw text, not meaning

use crate::error::{RouterError, RouterResult};
use crate::routing::value::{RouteValue, ValueKind};

/// Outcome of a successful token match.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentMatch {
    /// A static segment matched; nothing to extract.
    Static,
    /// A dynamic segment matched and produced a value.
    Value(RouteValue),
}

/// Trait for matching path tokens against a template segment.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns the match outcome, or `None` if the token does not match.
    fn is_match(&self, token: &str) -> Option<SegmentMatch>;
}

/// A literal segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSegment {
    literal: String,
}

impl StaticSegment {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl Matcher for StaticSegment {
    fn is_match(&self, token: &str) -> Option<SegmentMatch> {
        (token == self.literal).then_some(SegmentMatch::Static)
    }
}

/// A typed placeholder segment, `{name:type}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicSegment {
    raw: String,
    name: String,
    kind: ValueKind,
}

impl DynamicSegment {
    /// Parse the raw `{name:type}` text.
    pub fn parse(raw: &str) -> RouterResult<Self> {
        let inner = raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| format_error(raw))?;

        let mut parts = inner.split(':');
        let (name, keyword) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(keyword), None) if !name.is_empty() && !keyword.is_empty() => {
                (name, keyword)
            }
            _ => return Err(format_error(raw)),
        };

        let kind = ValueKind::from_keyword(keyword).ok_or_else(|| RouterError::UnsupportedType {
            keyword: keyword.to_string(),
        })?;

        Ok(Self {
            raw: raw.to_string(),
            name: name.to_string(),
            kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

impl Matcher for DynamicSegment {
    fn is_match(&self, token: &str) -> Option<SegmentMatch> {
        self.kind.parse(token).map(SegmentMatch::Value)
    }
}

fn format_error(raw: &str) -> RouterError {
    RouterError::Format {
        segment: raw.to_string(),
    }
}

/// A single component of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(StaticSegment),
    Dynamic(DynamicSegment),
}

impl Segment {
    /// Parse a raw template component.
    ///
    /// Text wrapped in `{}` is a dynamic segment and must be well formed;
    /// anything else is a literal.
    pub fn parse(raw: &str) -> RouterResult<Self> {
        if is_dynamic(raw) {
            DynamicSegment::parse(raw).map(Segment::Dynamic)
        } else {
            Ok(Segment::Static(StaticSegment::new(raw)))
        }
    }

    /// The text this segment was parsed from.
    pub fn raw(&self) -> &str {
        match self {
            Segment::Static(s) => s.literal(),
            Segment::Dynamic(d) => &d.raw,
        }
    }

    pub fn as_dynamic(&self) -> Option<&DynamicSegment> {
        match self {
            Segment::Dynamic(d) => Some(d),
            Segment::Static(_) => None,
        }
    }
}

impl Matcher for Segment {
    fn is_match(&self, token: &str) -> Option<SegmentMatch> {
        match self {
            Segment::Static(s) => s.is_match(token),
            Segment::Dynamic(d) => d.is_match(token),
        }
    }
}

fn is_dynamic(raw: &str) -> bool {
    raw.len() >= 2 && raw.starts_with('{') && raw.ends_with('}')
}
