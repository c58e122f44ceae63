//! Text (terminal) reporter with colors and formatting

use crate::audit::ScanSummary;
use crate::models::{format_bytes, Priority};
use crate::scoring::ScoreResult;
use anyhow::Result;
use serde_json::Value;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A" => "\x1b[32m", // Green
        "B" => "\x1b[92m", // Light green
        "C" => "\x1b[33m", // Yellow
        "D" => "\x1b[91m", // Light red
        "F" => "\x1b[31m", // Red
        _ => "\x1b[0m",
    }
}

fn priority_tag(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "\x1b[91m[H]",
        Priority::Medium => "\x1b[33m[M]",
        Priority::Low => "\x1b[34m[L]",
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

/// The one-line result printed by `check-url`: `<url> - <score>%`
pub fn summary_line(result: &ScoreResult) -> String {
    format!("{} - {}%", result.url, result.score)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("{} item(s)", items.len()),
        other => other.to_string(),
    }
}

/// Render a page result as a per-check table
pub fn render(result: &ScoreResult) -> Result<String> {
    let mut out = String::new();
    let grade = result.grade();
    let grade_c = grade_color(grade);

    out.push_str(&format!("\n{BOLD}{}{RESET}\n", result.url));
    out.push_str(&format!("{DIM}──────────────────────────────────────{RESET}\n"));
    out.push_str(&format!(
        "Score: {BOLD}{}%{RESET}  Grade: {grade_c}{BOLD}{}{RESET}  Passed: {}/{}\n\n",
        result.score,
        grade,
        result.passed().count(),
        result.checks.len()
    ));

    out.push_str(&format!("{DIM}  RESULT  PRI  CHECK{RESET}\n"));
    for check in &result.checks {
        let (mark, color) = if check.result.result {
            ("pass", GREEN)
        } else {
            ("FAIL", RED)
        };
        out.push_str(&format!(
            "  {color}{:<6}{RESET}  {}{RESET}  {}  {DIM}({}){RESET}\n",
            mark,
            priority_tag(check.descriptor.priority),
            check.descriptor.title,
            check.id
        ));

        if let Some(reason) = &check.result.failure_reason {
            out.push_str(&format!("          {DIM}└─{RESET} {}", reason));
            if let (Some(expected), Some(actual)) =
                (&check.result.expected_value, &check.result.actual_value)
            {
                out.push_str(&format!(
                    " {DIM}(expected {}, got {}){RESET}",
                    value_text(expected),
                    value_text(actual)
                ));
            }
            out.push('\n');
        }
    }

    let minutes = result.total_time_to_fix();
    if minutes > 0 {
        out.push_str(&format!(
            "\n{DIM}Estimated time to fix: {} min{RESET}\n",
            minutes
        ));
    }

    Ok(out)
}

/// Render a scan as one summary line per URL plus totals
pub fn render_scan(summary: &ScanSummary) -> Result<String> {
    let mut out = String::new();

    for result in &summary.results {
        out.push_str(&summary_line(result));
        out.push('\n');
    }
    for failure in &summary.failures {
        out.push_str(&format!(
            "{} - {RED}error{RESET} {DIM}{}{RESET}\n",
            failure.url, failure.error
        ));
    }

    out.push_str(&format!(
        "\n{BOLD}Scanned {} page(s){RESET}",
        summary.results.len() + summary.failures.len()
    ));
    if let Some(average) = summary.average_score() {
        out.push_str(&format!("  Average: {BOLD}{}%{RESET}", average));
    }
    if !summary.failures.is_empty() {
        out.push_str(&format!("  {RED}{} failed{RESET}", summary.failures.len()));
    }
    out.push_str(&format!(
        "  {DIM}in {:.1}s{RESET}\n",
        summary.duration.as_secs_f64()
    ));

    let html_bytes: u64 = summary
        .results
        .iter()
        .filter_map(|r| r.checks.iter().find(|c| c.id == "performance-html-size"))
        .filter_map(|c| c.result.actual_value.as_ref().and_then(Value::as_u64))
        .sum();
    if html_bytes > 0 {
        out.push_str(&format!(
            "{DIM}Oversized HTML total: {}{RESET}\n",
            format_bytes(html_bytes)
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::ScanFailure;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(&test_result()), "https://example.com/ - 66.67%");
    }

    #[test]
    fn test_whole_scores_print_without_decimals() {
        let mut result = test_result();
        result.score = 100.0;
        assert_eq!(summary_line(&result), "https://example.com/ - 100%");
    }

    #[test]
    fn test_render_lists_checks_and_reasons() {
        let out = render(&test_result()).expect("render");
        assert!(out.contains("The page has a title"));
        assert!(out.contains("(content-length)"));
        assert!(out.contains("The length of the content is too short"));
        assert!(out.contains("expected 2100, got 512"));
        assert!(out.contains("Estimated time to fix: 30 min"));
    }

    #[test]
    fn test_render_scan() {
        let summary = ScanSummary {
            results: vec![test_result()],
            failures: vec![ScanFailure {
                url: "https://down.example.com/".to_string(),
                error: "connection refused".to_string(),
            }],
            ..Default::default()
        };
        let out = render_scan(&summary).expect("render");
        assert!(out.starts_with("https://example.com/ - 66.67%\n"));
        assert!(out.contains("https://down.example.com/"));
        assert!(out.contains("Scanned 2 page(s)"));
    }
}
