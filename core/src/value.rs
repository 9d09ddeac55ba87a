//! The closed set of typed values an argument can produce.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coerced argument value.
///
/// Built-in coercers each produce one of these variants; composed coercers
/// (pairs) nest them. The set is closed on purpose: renderers and callers
/// can match exhaustively.
///
/// # Examples
///
/// ```
/// use argonaut_core::ArgValue;
///
/// let value = ArgValue::Pair(Box::new(ArgValue::Int(3)), Box::new(ArgValue::Str("x".into())));
/// let (first, second) = value.as_pair().unwrap();
/// assert_eq!(first.as_int(), Some(3));
/// assert_eq!(second.as_str(), Some("x"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    /// Presence flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Occurrence counter.
    Count(u32),
    /// Verbatim string.
    Str(String),
    /// Bulk text, e.g. file contents or drained standard input.
    Text(String),
    /// Two composed sub-values.
    Pair(Box<ArgValue>, Box<ArgValue>),
}

impl ArgValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u32> {
        match self {
            Self::Count(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) | Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&ArgValue, &ArgValue)> {
        match self {
            Self::Pair(first, second) => Some((first, second)),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Count(v) => write!(f, "{v}"),
            Self::Str(v) | Self::Text(v) => write!(f, "{v}"),
            Self::Pair(first, second) => write!(f, "({first}, {second})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_reject_other_variants() {
        assert_eq!(ArgValue::Int(7).as_int(), Some(7));
        assert_eq!(ArgValue::Int(7).as_bool(), None);
        assert_eq!(ArgValue::Str("a".into()).as_str(), Some("a"));
        assert_eq!(ArgValue::Count(2).as_count(), Some(2));
    }

    #[test]
    fn test_display_nests_pairs() {
        let value = ArgValue::Pair(
            Box::new(ArgValue::Int(1)),
            Box::new(ArgValue::Str("b".into())),
        );
        assert_eq!(value.to_string(), "(1, b)");
    }
}
