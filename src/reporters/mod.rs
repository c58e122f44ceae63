//! Output reporters for audit results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON

mod json;
mod text;

pub use text::summary_line;

use crate::audit::ScanSummary;
use crate::scoring::ScoreResult;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render one page result in the specified format
pub fn report(result: &ScoreResult, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(result, fmt)
}

/// Render one page result using an OutputFormat enum
pub fn report_with_format(result: &ScoreResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(result),
        OutputFormat::Json => json::render(result),
    }
}

/// Render a full scan
pub fn report_scan(summary: &ScanSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_scan(summary),
        OutputFormat::Json => json::render_scan(summary),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::checks::CheckDescriptor;
    use crate::models::{CheckResult, Priority};
    use crate::pipeline::RecordedCheck;
    use serde_json::Value;

    /// A result with one passed and one failed check
    pub(crate) fn test_result() -> ScoreResult {
        ScoreResult::from_checks(
            "https://example.com/",
            vec![
                (
                    "meta-title",
                    RecordedCheck {
                        descriptor: CheckDescriptor::new("The page has a title")
                            .with_priority(Priority::High)
                            .with_time_to_fix(5)
                            .with_weight(10.0),
                        result: CheckResult::passed(),
                    },
                ),
                (
                    "content-length",
                    RecordedCheck {
                        descriptor: CheckDescriptor::new(
                            "Length of the content is at least 2100 characters",
                        )
                        .with_time_to_fix(30)
                        .with_weight(5.0),
                        result: CheckResult::failed(
                            Some("The length of the content is too short".to_string()),
                            Some(Value::from(2100)),
                            Some(Value::from(512)),
                        ),
                    },
                ),
            ],
        )
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_report_dispatch() {
        let result = test_result();
        assert!(report(&result, "json").unwrap().trim_start().starts_with('{'));
        assert!(report(&result, "text").unwrap().contains("66.67"));
        assert!(report(&result, "xml").is_err());
    }
}
