//! The parse-failure taxonomy.
//!
//! Everything here is *recovered*: a failing token or argument never
//! aborts the parse. The only fatal conditions in the engine are
//! schema-contract violations, and those are rejected at build time in
//! `argonaut-core`.

use argonaut_core::{ErrorLevel, Range};
use thiserror::Error;

/// Malformed raw input found during tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeErrorKind {
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    pub kind: TokenizeErrorKind,
    /// Byte offset of the offending character.
    pub position: usize,
}

impl TokenizeError {
    pub fn level(&self) -> ErrorLevel {
        ErrorLevel::Error
    }
}

/// Structural errors found while matching tokens against the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A value token with no positional argument left to claim it.
    #[error("unexpected value '{0}'")]
    UnexpectedValue(String),
    /// A name-shaped token matching no argument of the current command.
    #[error("unknown argument '{0}'")]
    UnmatchedArgument(String),
    /// An obligatory argument was never used and no unique-override
    /// sibling was used either.
    #[error("argument '{name}' is obligatory")]
    ObligatoryNotUsed { name: String },
    /// The argument appeared more or fewer times than its usage arity
    /// admits.
    #[error("argument '{name}' was used {actual} time(s), expected {expected}")]
    IncorrectUsageCount {
        name: String,
        expected: Range,
        actual: u16,
    },
    /// An invocation received fewer values than the arity minimum.
    #[error("argument '{name}' expects {expected} value(s), got {received}")]
    IncorrectValueCount {
        name: String,
        expected: Range,
        received: usize,
    },
    /// More than one argument of an exclusive group (chain) was used.
    #[error("argument '{name}' cannot be used: another argument of exclusive group '{group}' was already used")]
    ExclusivityViolation { name: String, group: String },
    /// An obligatory sub-command was never invoked.
    #[error("command '{0}' must be used")]
    ObligatoryCommandNotUsed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset of the token the error is anchored to; `None` for
    /// input-less errors such as a missing obligatory argument.
    pub position: Option<usize>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: Option<usize>) -> Self {
        Self { kind, position }
    }

    pub fn level(&self) -> ErrorLevel {
        ErrorLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let error = ParseError::new(
            ParseErrorKind::IncorrectUsageCount {
                name: "retry".into(),
                expected: Range::OPTIONAL,
                actual: 3,
            },
            Some(4),
        );
        assert_eq!(
            error.kind.to_string(),
            "argument 'retry' was used 3 time(s), expected between 0 and 1"
        );

        let error = TokenizeErrorKind::UnknownEscape('q');
        assert_eq!(error.to_string(), "unknown escape sequence '\\q'");
    }
}
