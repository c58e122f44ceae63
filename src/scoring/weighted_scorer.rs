use crate::checks::{CheckDescriptor, CheckId};
use crate::models::{grade_from_score, CheckResult};
use crate::pipeline::{RecordedCheck, RunContext};
use serde::Serialize;

/// One executed check in a score breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub id: CheckId,
    #[serde(flatten)]
    pub descriptor: CheckDescriptor,
    #[serde(flatten)]
    pub result: CheckResult,
}

/// Final result of auditing one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub url: String,
    /// Percentage in [0, 100], two decimals
    pub score: f64,
    /// Executed checks in run order
    pub checks: Vec<CheckReport>,
}

impl ScoreResult {
    /// Score recorded checks. Insertion order is preserved.
    pub fn from_checks(
        url: impl Into<String>,
        checks: impl IntoIterator<Item = (CheckId, RecordedCheck)>,
    ) -> Self {
        let checks: Vec<CheckReport> = checks
            .into_iter()
            .map(|(id, recorded)| CheckReport {
                id,
                descriptor: recorded.descriptor,
                result: recorded.result,
            })
            .collect();

        let total: f64 = checks.iter().map(|c| c.descriptor.score_weight).sum();
        let passed: f64 = checks
            .iter()
            .filter(|c| c.result.result)
            .map(|c| c.descriptor.score_weight)
            .sum();

        let all_passed = checks.iter().all(|c| c.result.result);
        let score = if total <= 0.0 {
            100.0
        } else {
            let rounded = round2(100.0 * passed / total).clamp(0.0, 100.0);
            // 100 only when nothing failed, however small the failed weight
            if !all_passed && rounded >= 100.0 {
                99.99
            } else {
                rounded
            }
        };

        Self {
            url: url.into(),
            score,
            checks,
        }
    }

    pub fn passed(&self) -> impl Iterator<Item = &CheckReport> {
        self.checks.iter().filter(|c| c.result.result)
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckReport> {
        self.checks.iter().filter(|c| !c.result.result)
    }

    /// Minutes needed to fix every failed check
    pub fn total_time_to_fix(&self) -> u32 {
        self.failed().map(|c| c.descriptor.time_to_fix_minutes).sum()
    }

    pub fn grade(&self) -> &'static str {
        grade_from_score(self.score)
    }
}

/// Reduce a finished run into the score reported for `url`
pub fn score_run(url: impl Into<String>, ctx: RunContext<'_>) -> ScoreResult {
    ScoreResult::from_checks(url, ctx.into_results())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn recorded(weight: f64, passed: bool) -> RecordedCheck {
        RecordedCheck {
            descriptor: CheckDescriptor::new("t")
                .with_weight(weight)
                .with_time_to_fix(10),
            result: if passed {
                CheckResult::passed()
            } else {
                CheckResult::failed(Some("x".to_string()), None, None)
            },
        }
    }

    fn score(checks: Vec<(CheckId, RecordedCheck)>) -> ScoreResult {
        ScoreResult::from_checks("https://example.com/", checks)
    }

    #[test]
    fn test_all_passed_is_100() {
        let result = score(vec![("a", recorded(10.0, true)), ("b", recorded(5.0, true))]);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.grade(), "A");
    }

    #[test]
    fn test_nothing_ran_is_100() {
        assert_eq!(score(Vec::new()).score, 100.0);
    }

    #[test]
    fn test_weighted_ratio() {
        let result = score(vec![
            ("a", recorded(10.0, true)),
            ("b", recorded(20.0, true)),
            ("c", recorded(30.0, false)),
        ]);
        assert_eq!(result.score, 50.0);
        assert_eq!(result.passed().count(), 2);
        assert_eq!(result.failed().count(), 1);
        assert_eq!(result.total_time_to_fix(), 10);
    }

    #[test]
    fn test_tiny_failed_weight_never_scores_100() {
        let result = score(vec![("a", recorded(100_000.0, true)), ("b", recorded(1.0, false))]);
        assert_eq!(result.score, 99.99);
        assert_eq!(result.failed().count(), 1);
    }

    #[test]
    fn test_skipped_checks_are_excluded() {
        // c (weight 30) was skipped after a fatal failure of b
        let result = score(vec![("a", recorded(10.0, true)), ("b", recorded(20.0, false))]);
        assert_eq!(result.score, 33.33);
    }

    #[test]
    fn test_all_failed_is_0() {
        let result = score(vec![("a", recorded(10.0, false))]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.grade(), "F");
    }

    #[test]
    fn test_order_is_preserved() {
        let result = score(vec![
            ("z", recorded(1.0, true)),
            ("a", recorded(1.0, true)),
            ("m", recorded(1.0, true)),
        ]);
        let ids: Vec<CheckId> = result.checks.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_report_serializes_flat() {
        let mut check = recorded(5.0, false);
        check.descriptor.priority = Priority::Low;
        let result = score(vec![("content-length", check)]);

        let json = serde_json::to_value(&result).expect("serialize");
        let entry = &json["checks"][0];
        assert_eq!(entry["id"], "content-length");
        assert_eq!(entry["scoreWeight"], 5.0);
        assert_eq!(entry["timeToFix"], 10);
        assert_eq!(entry["result"], false);
        assert_eq!(entry["failureReason"], "x");
        assert!(entry.get("expectedValue").is_none());
    }
}
