//! JSON reporter
//!
//! Outputs `{url, score, checks: [...]}` with camelCase check fields.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::audit::ScanSummary;
use crate::scoring::ScoreResult;
use anyhow::Result;
use serde_json::json;

/// Render a page result as JSON
pub fn render(result: &ScoreResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Render a scan as JSON
pub fn render_scan(summary: &ScanSummary) -> Result<String> {
    let failures: Vec<_> = summary
        .failures
        .iter()
        .map(|f| json!({ "url": f.url, "error": f.error }))
        .collect();

    let value = json!({
        "results": summary.results,
        "failures": failures,
        "averageScore": summary.average_score(),
        "durationMs": summary.duration.as_millis() as u64,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
