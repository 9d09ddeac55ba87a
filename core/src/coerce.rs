//! The value-coercion contract shared by every argument type.

use std::fmt;

use serde::Serialize;

use crate::level::ErrorLevel;
use crate::range::Range;
use crate::value::ArgValue;

/// An error raised by a coercer, indexed into the invocation's value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionIssue {
    pub message: String,
    /// 0-based index into the received values; `None` blames the whole
    /// invocation.
    pub value_index: Option<usize>,
    pub level: ErrorLevel,
}

/// An error message anchored to an absolute input position.
///
/// This is the positioned form diagnostics are stored in once the engine
/// has resolved value indices against real tokens. Caller-injected custom
/// errors use the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub message: String,
    pub level: ErrorLevel,
    /// Absolute byte offset into the raw input; `None` for input-less
    /// errors, which sort last.
    pub position: Option<usize>,
}

impl Note {
    pub fn new(message: impl Into<String>, level: ErrorLevel, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            level,
            position,
        }
    }
}

/// Collects errors raised during one coercer invocation.
///
/// The sink knows how many raw values the invocation received and validates
/// every reported index against that window. Composed coercers report their
/// sub-units' issues through [`CoercionSink::absorb`], which rebases value
/// indices by the sub-unit's offset so positions always resolve to the
/// outer invocation.
#[derive(Debug)]
pub struct CoercionSink {
    received: usize,
    issues: Vec<CoercionIssue>,
}

impl CoercionSink {
    pub fn new(received: usize) -> Self {
        Self {
            received,
            issues: Vec::new(),
        }
    }

    /// Reports an error-level issue. See [`CoercionSink::report`].
    pub fn error(&mut self, message: impl Into<String>, value_index: Option<usize>) {
        self.report(message, value_index, ErrorLevel::Error);
    }

    /// Reports an issue at the given severity.
    ///
    /// # Panics
    ///
    /// Panics when `value_index` lies outside `[0, received)`. An
    /// out-of-range index is a programming-contract violation in the
    /// coercer, never a user-facing parse error.
    pub fn report(&mut self, message: impl Into<String>, value_index: Option<usize>, level: ErrorLevel) {
        if let Some(index) = value_index {
            assert!(
                index < self.received,
                "value index {index} out of range for {} received value(s)",
                self.received
            );
        }
        self.issues.push(CoercionIssue {
            message: message.into(),
            value_index,
            level,
        });
    }

    /// Merges a sub-unit's issues, shifting each value index by `offset`.
    pub fn absorb(&mut self, sub: CoercionSink, offset: usize) {
        for mut issue in sub.issues {
            if let Some(index) = issue.value_index {
                issue.value_index = Some(index + offset);
            }
            self.issues.push(issue);
        }
    }

    /// Number of raw values the invocation received.
    pub fn received(&self) -> usize {
        self.received
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<CoercionIssue> {
        self.issues
    }
}

/// A per-argument value parser.
///
/// Each argument owns exactly one boxed coercer; it is never shared. The
/// coercer declares how many raw values it consumes per invocation and how
/// many times the argument may appear, turns raw strings into an
/// [`ArgValue`], and reports failures through a [`CoercionSink`] instead of
/// aborting.
///
/// Implementations accumulate state across invocations (a counter type
/// increments each time) and must fully clear it in
/// [`reset`](Coercer::reset); the engine resets every coercer before a
/// fresh parse.
pub trait Coercer: fmt::Debug {
    /// Raw values consumed per invocation. Defaults to exactly one.
    fn arity(&self) -> Range {
        Range::ONE
    }

    /// Times the argument may appear across a parse. Defaults to at most
    /// once.
    fn usage_arity(&self) -> Range {
        Range::OPTIONAL
    }

    /// Parses one invocation's values. The slice length is guaranteed to
    /// satisfy [`arity`](Coercer::arity); failures go through the sink.
    fn coerce(&mut self, values: &[String], sink: &mut CoercionSink);

    /// The accumulated value, or `None` if nothing has been coerced yet.
    fn value(&self) -> Option<ArgValue>;

    /// The value used when the argument was never invoked and no default is
    /// set. `None` means "undefined".
    fn initial_value(&self) -> Option<ArgValue> {
        None
    }

    /// Clears all accumulated state.
    fn reset(&mut self);

    /// Short type name for diagnostics.
    fn representation(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_accepts_in_range_and_whole_invocation_indices() {
        let mut sink = CoercionSink::new(2);
        sink.error("bad first", Some(0));
        sink.error("bad second", Some(1));
        sink.error("bad invocation", None);
        assert_eq!(sink.into_issues().len(), 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_sink_panics_on_out_of_range_index() {
        let mut sink = CoercionSink::new(1);
        sink.error("bad", Some(1));
    }

    #[test]
    fn test_absorb_rebases_value_indices() {
        let mut sub = CoercionSink::new(1);
        sub.error("sub failure", Some(0));
        sub.error("whole failure", None);

        let mut outer = CoercionSink::new(3);
        outer.absorb(sub, 2);

        let issues = outer.into_issues();
        assert_eq!(issues[0].value_index, Some(2));
        assert_eq!(issues[1].value_index, None);
    }
}
