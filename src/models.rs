//! Core data models shared by checks, the pipeline and reporters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How urgent fixing a failed check is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Result of one check unit within one run.
///
/// Failure fields are only ever populated when `result` is `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<Value>,
}

impl CheckResult {
    pub fn passed() -> Self {
        Self {
            result: true,
            failure_reason: None,
            expected_value: None,
            actual_value: None,
        }
    }

    pub fn failed(
        failure_reason: Option<String>,
        expected_value: Option<Value>,
        actual_value: Option<Value>,
    ) -> Self {
        Self {
            result: false,
            failure_reason,
            expected_value,
            actual_value,
        }
    }

    /// Failure recorded when a check errored or panicked instead of answering
    pub fn internal_error() -> Self {
        Self::failed(Some("internal error".to_string()), None, None)
    }
}

/// Letter grade for a percentage score
pub fn grade_from_score(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "A",
        s if s >= 80.0 => "B",
        s if s >= 70.0 => "C",
        s if s >= 60.0 => "D",
        _ => "F",
    }
}

/// Human-readable byte count using decimal units (1 KB = 1000 B),
/// rounded to two decimals: `1532` -> `"1.53 KB"`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
