//! Output formatting for parse reports.

use argonaut_core::ErrorLevel;

use crate::collect::Diagnostic;

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Formats a list of diagnostics in the requested output format.
pub fn format_diagnostics(diagnostics: &[Diagnostic], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(diagnostics)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Text => Ok(diagnostics_to_text(diagnostics)),
    }
}

fn diagnostics_to_text(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let tag = match diagnostic.level {
            ErrorLevel::Debug => "debug",
            ErrorLevel::Info => "info",
            ErrorLevel::Warning => "warning",
            ErrorLevel::Error => "error",
        };
        match diagnostic.position {
            Some(position) => {
                out.push_str(&format!("{tag}: {} (at {position})\n", diagnostic.message));
            }
            None => {
                out.push_str(&format!("{tag}: {}\n", diagnostic.message));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_diagnostics() -> Vec<Diagnostic> {
        vec![
            Diagnostic {
                level: ErrorLevel::Error,
                position: Some(6),
                message: "invalid integer value: 'abc'".to_string(),
            },
            Diagnostic {
                level: ErrorLevel::Error,
                position: None,
                message: "obligatory argument 'output' was not used".to_string(),
            },
        ]
    }

    #[test]
    fn test_format_diagnostics_json() {
        let result = format_diagnostics(&sample_diagnostics(), OutputFormat::Json);
        assert!(result.is_ok());
        let json = result.unwrap();
        assert!(json.contains("\"position\": 6"));
        assert!(json.contains("\"position\": null"));
        assert!(json.contains("invalid integer value"));
    }

    #[test]
    fn test_format_diagnostics_text() {
        let text = format_diagnostics(&sample_diagnostics(), OutputFormat::Text).unwrap();
        assert!(text.contains("error: invalid integer value: 'abc' (at 6)"));
        assert!(text.contains("error: obligatory argument 'output' was not used\n"));
    }

    #[test]
    fn test_format_empty_report() {
        let text = format_diagnostics(&[], OutputFormat::Text).unwrap();
        assert!(text.is_empty());
    }
}
