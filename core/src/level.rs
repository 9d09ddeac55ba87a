//! Error severity levels and per-command reporting thresholds.

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic, ordered from least to most severe.
///
/// Every diagnostic the engine produces carries a level. Two thresholds on
/// each command decide what happens with it: the *display* threshold gates
/// whether the diagnostic is reported at all, and the stricter *exit*
/// threshold gates whether the whole parse counts as failed.
///
/// # Examples
///
/// ```
/// use argonaut_core::ErrorLevel;
///
/// assert!(ErrorLevel::Error > ErrorLevel::Warning);
/// assert!(ErrorLevel::Info > ErrorLevel::Debug);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorLevel {
    /// Developer-facing detail.
    Debug,
    /// Informational notice.
    Info,
    /// A recoverable problem worth reporting.
    Warning,
    /// A problem that should fail the parse.
    Error,
}

/// Per-command severity cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorThresholds {
    /// Minimum level a diagnostic needs to be included in the report.
    pub display: ErrorLevel,
    /// Minimum level a diagnostic needs to mark the parse as failed.
    pub exit: ErrorLevel,
}

impl Default for ErrorThresholds {
    fn default() -> Self {
        Self {
            display: ErrorLevel::Info,
            exit: ErrorLevel::Error,
        }
    }
}
