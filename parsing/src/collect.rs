//! Diagnostic collection: gathering, filtering, and ordering everything a
//! parse produced into one position-sorted report.
//!
//! Within a command the sources are interleaved in a fixed order (tokenizer
//! errors, then structural parse errors, then per-argument coercion errors
//! and notes, then command notes), the invoked command chain is visited
//! root first, and the combined list is stably sorted by absolute input
//! position with positionless diagnostics last. The stable sort keeps the
//! source order as the tie-break.

use std::fmt;

use argonaut_core::{ErrorLevel, Schema};
use serde::Serialize;

use crate::error::TokenizeError;
use crate::parse::ParseRun;

/// One entry of the final parse report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: ErrorLevel,
    /// Absolute byte offset into the raw input, when known.
    pub position: Option<usize>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{:?} at {}: {}", self.level, position, self.message),
            None => write!(f, "{:?}: {}", self.level, self.message),
        }
    }
}

/// Drains all diagnostic sources for one parse run and returns the
/// display-filtered, position-sorted report plus the overall failure flag.
///
/// The failure flag is computed against each command's exit threshold
/// *before* display filtering, so a suppressed diagnostic can still fail
/// the parse.
pub(crate) fn collect(
    schema: &Schema,
    run: &ParseRun,
    tokenize_errors: &[TokenizeError],
) -> (Vec<Diagnostic>, bool) {
    let mut diagnostics = Vec::new();
    let mut failed = false;

    for &command in &run.invoked {
        let thresholds = schema.command(command).thresholds();
        let mut push = |level: ErrorLevel, position: Option<usize>, message: String| {
            if level >= thresholds.exit {
                failed = true;
            }
            if level >= thresholds.display {
                diagnostics.push(Diagnostic {
                    level,
                    position,
                    message,
                });
            }
        };

        if command == schema.root() {
            for error in tokenize_errors {
                push(error.level(), Some(error.position), error.kind.to_string());
            }
        }

        if let Some(errors) = run.errors.get(&command) {
            for error in errors {
                push(error.level(), error.position, error.kind.to_string());
            }
        }

        for &arg in schema.command(command).arguments() {
            let argument = schema.argument(arg);
            for note in argument.errors() {
                push(note.level, note.position, note.message.clone());
            }
            for note in argument.notes() {
                push(note.level, note.position, note.message.clone());
            }
        }

        for note in schema.command(command).notes() {
            push(note.level, note.position, note.message.clone());
        }
    }

    diagnostics.sort_by_key(|diagnostic| diagnostic.position.unwrap_or(usize::MAX));
    (diagnostics, failed)
}
