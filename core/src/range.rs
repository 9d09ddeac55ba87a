//! Inclusive count ranges for arity and usage contracts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An inclusive range of counts with an optional upper bound.
///
/// Used for two contracts on every argument: how many raw values one
/// invocation consumes (its *arity*), and how many times the argument may
/// appear across a whole parse (its *usage arity*). `max = None` means
/// unbounded.
///
/// # Examples
///
/// ```
/// use argonaut_core::Range;
///
/// assert!(Range::ONE.contains(1));
/// assert!(!Range::ONE.contains(2));
/// assert!(Range::at_least(2).contains(100));
/// assert_eq!(Range::NONE.max, Some(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: u16,
    pub max: Option<u16>,
}

impl Range {
    /// No values at all (presence-only).
    pub const NONE: Range = Range { min: 0, max: Some(0) };
    /// Exactly one value.
    pub const ONE: Range = Range { min: 1, max: Some(1) };
    /// Any number of values, including zero.
    pub const ANY: Range = Range { min: 0, max: None };
    /// One or more values.
    pub const AT_LEAST_ONE: Range = Range { min: 1, max: None };
    /// Zero or one, the default usage arity.
    pub const OPTIONAL: Range = Range { min: 0, max: Some(1) };

    /// Creates a bounded range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`; an inverted range is a schema-contract
    /// violation and must fail at construction time.
    pub const fn new(min: u16, max: u16) -> Self {
        assert!(min <= max, "range min must not exceed max");
        Self { min, max: Some(max) }
    }

    /// Creates a range with exactly `n` as both bounds.
    pub const fn exactly(n: u16) -> Self {
        Self { min: n, max: Some(n) }
    }

    /// Creates a lower-bounded range with no upper bound.
    pub const fn at_least(min: u16) -> Self {
        Self { min, max: None }
    }

    /// Returns `true` when `n` falls within the range.
    pub fn contains(&self, n: u16) -> bool {
        n >= self.min && self.max.is_none_or(|max| n <= max)
    }

    /// Returns `true` when the range admits no values at all.
    pub const fn is_none(&self) -> bool {
        matches!(self.max, Some(0))
    }

    /// Returns `true` when `n` does not exceed the upper bound.
    pub fn admits(&self, n: u16) -> bool {
        self.max.is_none_or(|max| n <= max)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, Some(0)) => write!(f, "none"),
            (min, Some(max)) if min == max => write!(f, "exactly {min}"),
            (min, Some(max)) => write!(f, "between {min} and {max}"),
            (min, None) => write!(f, "at least {min}"),
        }
    }
}
