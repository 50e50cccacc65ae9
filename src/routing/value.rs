//! Typed values carried by dynamic segments.
//!
//! # Design Decisions
//! - Parsing is strict and locale-independent
//! - No coercion across kinds: a token is tried only as its declared kind
//! - Timestamps are RFC 3339 and normalized to UTC

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Length of the canonical 8-4-4-4-12 hyphenated UUID form.
const HYPHENATED_UUID_LEN: usize = 36;

/// The closed set of value kinds a dynamic segment may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Uuid,
    Timestamp,
}

impl ValueKind {
    /// Resolve a template type keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "int" => Some(ValueKind::Int),
            "float" => Some(ValueKind::Float),
            "guid" => Some(ValueKind::Uuid),
            "datetime" => Some(ValueKind::Timestamp),
            _ => None,
        }
    }

    /// The keyword used for this kind in templates.
    pub fn keyword(&self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Uuid => "guid",
            ValueKind::Timestamp => "datetime",
        }
    }

    /// Parse a path token as this kind.
    pub fn parse(&self, token: &str) -> Option<RouteValue> {
        match self {
            ValueKind::Int => token.parse::<i64>().ok().map(RouteValue::Int),
            ValueKind::Float => parse_float(token).map(RouteValue::Float),
            ValueKind::Uuid => parse_uuid(token).map(RouteValue::Uuid),
            ValueKind::Timestamp => DateTime::parse_from_rfc3339(token)
                .ok()
                .map(|dt| RouteValue::Timestamp(dt.with_timezone(&Utc))),
        }
    }

    /// The zero value used for argument slots that were never populated.
    pub fn zero(&self) -> RouteValue {
        match self {
            ValueKind::Int => RouteValue::Int(0),
            ValueKind::Float => RouteValue::Float(0.0),
            ValueKind::Uuid => RouteValue::Uuid(Uuid::nil()),
            ValueKind::Timestamp => RouteValue::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A value extracted from a path token.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteValue {
    Int(i64),
    Float(f64),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl RouteValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            RouteValue::Int(_) => ValueKind::Int,
            RouteValue::Float(_) => ValueKind::Float,
            RouteValue::Uuid(_) => ValueKind::Uuid,
            RouteValue::Timestamp(_) => ValueKind::Timestamp,
        }
    }
}

impl fmt::Display for RouteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteValue::Int(v) => write!(f, "{}", v),
            RouteValue::Float(v) => write!(f, "{}", v),
            RouteValue::Uuid(v) => write!(f, "{}", v),
            RouteValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

/// Parse `[+-]digits[.digits][(e|E)[+-]digits]`.
///
/// `f64::from_str` also accepts `inf`, `NaN` and `infinity`; those are not
/// path values, so the shape is checked before handing the token over.
fn parse_float(token: &str) -> Option<f64> {
    let bytes = token.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let mut mantissa_digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let exponent_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exponent_start {
            return None;
        }
    }

    if i != bytes.len() {
        return None;
    }

    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_uuid(token: &str) -> Option<Uuid> {
    // Only the hyphenated form is 36 characters long.
    if token.len() != HYPHENATED_UUID_LEN {
        return None;
    }
    Uuid::parse_str(token).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(ValueKind::from_keyword("int"), Some(ValueKind::Int));
        assert_eq!(ValueKind::from_keyword("float"), Some(ValueKind::Float));
        assert_eq!(ValueKind::from_keyword("guid"), Some(ValueKind::Uuid));
        assert_eq!(ValueKind::from_keyword("datetime"), Some(ValueKind::Timestamp));
        assert_eq!(ValueKind::from_keyword("Int"), None);
        assert_eq!(ValueKind::from_keyword("string"), None);
    }

    #[test]
    fn test_int_parsing() {
        assert_eq!(ValueKind::Int.parse("42"), Some(RouteValue::Int(42)));
        assert_eq!(ValueKind::Int.parse("-7"), Some(RouteValue::Int(-7)));
        assert_eq!(ValueKind::Int.parse("+7"), Some(RouteValue::Int(7)));
        assert_eq!(ValueKind::Int.parse(" 7"), None);
        assert_eq!(ValueKind::Int.parse("7.0"), None);
        assert_eq!(ValueKind::Int.parse("9223372036854775808"), None); // overflow
        assert_eq!(ValueKind::Int.parse(""), None);
    }

    #[test]
    fn test_float_parsing() {
        assert_eq!(ValueKind::Float.parse("1.5"), Some(RouteValue::Float(1.5)));
        assert_eq!(ValueKind::Float.parse("-2"), Some(RouteValue::Float(-2.0)));
        assert_eq!(ValueKind::Float.parse(".5"), Some(RouteValue::Float(0.5)));
        assert_eq!(ValueKind::Float.parse("3."), Some(RouteValue::Float(3.0)));
        assert_eq!(ValueKind::Float.parse("1e3"), Some(RouteValue::Float(1000.0)));
        assert_eq!(ValueKind::Float.parse("2.5E-1"), Some(RouteValue::Float(0.25)));

        for bad in ["inf", "NaN", "infinity", "1e", "e5", ".", "1,5", "1.2.3", "1e400", ""] {
            assert_eq!(ValueKind::Float.parse(bad), None, "accepted {bad:?}");
        }
    }

    #[test]
    fn test_uuid_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(
            ValueKind::Uuid.parse(&id.to_string()),
            Some(RouteValue::Uuid(id))
        );
        assert_eq!(
            ValueKind::Uuid.parse(&id.to_string().to_uppercase()),
            Some(RouteValue::Uuid(id))
        );

        // Non-canonical forms are rejected.
        assert_eq!(ValueKind::Uuid.parse(&id.simple().to_string()), None);
        assert_eq!(ValueKind::Uuid.parse(&id.braced().to_string()), None);
        assert_eq!(ValueKind::Uuid.parse(&id.urn().to_string()), None);
        assert_eq!(ValueKind::Uuid.parse("2"), None);
    }

    #[test]
    fn test_timestamp_parsing() {
        let parsed = ValueKind::Timestamp.parse("2024-05-01T12:30:00+03:00").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-05-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, RouteValue::Timestamp(expected));

        assert!(ValueKind::Timestamp.parse("2024-05-01").is_none());
        assert!(ValueKind::Timestamp.parse("05/01/2024 12:30").is_none());
        assert!(ValueKind::Timestamp.parse("2024-05-01T12:30:00").is_none()); // no offset
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(ValueKind::Int.zero(), RouteValue::Int(0));
        assert_eq!(ValueKind::Uuid.zero(), RouteValue::Uuid(Uuid::nil()));
        for kind in [ValueKind::Int, ValueKind::Float, ValueKind::Uuid, ValueKind::Timestamp] {
            assert_eq!(kind.zero().kind(), kind);
        }
    }
}
