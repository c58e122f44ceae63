//! Pipeline and scoring contract tests
//!
//! Drive the public library API with stub checks and in-memory
//! responses; no network access.

use anyhow::Result;
use seo_audit::audit::Auditor;
use seo_audit::checks::{
    CheckDescriptor, CheckId, CheckOutcome, CheckRegistry, CheckUnit, ContentLengthCheck, Page,
};
use seo_audit::config::SeoConfig;
use seo_audit::http::Response;
use seo_audit::pipeline;
use seo_audit::scoring::score_run;
use std::sync::Arc;

struct Stub {
    id: CheckId,
    descriptor: CheckDescriptor,
    pass: bool,
}

impl Stub {
    fn new(id: CheckId, weight: f64, pass: bool) -> Self {
        Self {
            id,
            descriptor: CheckDescriptor::new(id).with_weight(weight),
            pass,
        }
    }

    fn fatal(mut self) -> Self {
        self.descriptor = self.descriptor.fatal();
        self
    }
}

impl CheckUnit for Stub {
    fn id(&self) -> CheckId {
        self.id
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, _page: &Page<'_>) -> Result<CheckOutcome> {
        if self.pass {
            Ok(CheckOutcome::Pass)
        } else {
            Ok(CheckOutcome::fail("stub failure"))
        }
    }
}

fn page() -> Page<'static> {
    Page::new(Response::new(200, "https://example.com/", "<p>hello</p>"))
}

fn score(checks: Vec<Stub>) -> seo_audit::scoring::ScoreResult {
    let checks: Vec<Arc<dyn CheckUnit>> = checks
        .into_iter()
        .map(|c| Arc::new(c) as Arc<dyn CheckUnit>)
        .collect();
    score_run("https://example.com/", pipeline::run(&checks, page()))
}

#[test]
fn all_passing_checks_score_100() {
    let result = score(vec![
        Stub::new("a", 10.0, true),
        Stub::new("b", 20.0, true),
        Stub::new("c", 30.0, true),
    ]);
    assert_eq!(result.score, 100.0);
}

#[test]
fn failed_check_costs_its_weight() {
    let result = score(vec![
        Stub::new("a", 10.0, true),
        Stub::new("b", 20.0, true),
        Stub::new("c", 30.0, false),
    ]);
    assert_eq!(result.score, 50.0);
}

#[test]
fn any_failed_check_keeps_score_below_100() {
    let result = score(vec![
        Stub::new("heavy", 100_000.0, true),
        Stub::new("light", 1.0, false),
    ]);
    assert_eq!(result.failed().count(), 1);
    assert!(result.score < 100.0);
    assert_eq!(result.score, 99.99);
}

#[test]
fn checks_after_fatal_failure_are_excluded() {
    let result = score(vec![
        Stub::new("a", 10.0, true),
        Stub::new("b", 20.0, false).fatal(),
        Stub::new("c", 30.0, true),
    ]);
    let ids: Vec<CheckId> = result.checks.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(result.score, 33.33);
}

#[test]
fn fatal_check_that_passes_does_not_stop_the_run() {
    let result = score(vec![
        Stub::new("a", 10.0, true).fatal(),
        Stub::new("b", 10.0, false),
    ]);
    assert_eq!(result.checks.len(), 2);
    assert_eq!(result.score, 50.0);
}

#[test]
fn runs_are_deterministic() {
    let build = || {
        score(vec![
            Stub::new("x", 3.0, false),
            Stub::new("y", 7.0, true),
        ])
    };
    assert_eq!(build(), build());
}

#[test]
fn content_length_boundary() {
    let auditor = Auditor::new(SeoConfig {
        checks: vec![ContentLengthCheck::ID.to_string()],
        ..Default::default()
    })
    .expect("auditor");

    let body = |n: usize| format!("<html><body><p>{}</p></body></html>", "a".repeat(n));

    let at = auditor.check_response(
        "https://example.com/",
        Response::new(200, "https://example.com/", body(2100)),
    );
    assert_eq!(at.score, 100.0);

    let below = auditor.check_response(
        "https://example.com/",
        Response::new(200, "https://example.com/", body(2099)),
    );
    assert_eq!(below.score, 0.0);
    let check = &below.checks[0];
    assert_eq!(
        check.result.failure_reason.as_deref(),
        Some("The length of the content is too short")
    );
    assert_eq!(check.result.expected_value, Some(serde_json::json!(2100)));
    assert_eq!(check.result.actual_value, Some(serde_json::json!(2099)));
}

#[test]
fn error_status_skips_every_other_builtin_check() {
    let auditor = Auditor::new(SeoConfig::default()).expect("auditor");
    let result = auditor.check_response(
        "https://example.com/gone",
        Response::new(404, "https://example.com/gone", "<title>Gone</title>"),
    );
    assert_eq!(result.checks.len(), 1);
    assert_eq!(result.checks[0].id, "response-status");
    assert_eq!(result.score, 0.0);
}

#[test]
fn registry_filters_and_orders_builtin_checks() {
    let registry = CheckRegistry::builtin()
        .with_include(vec![
            "performance-ttfb".to_string(),
            "content-length".to_string(),
            "meta-title".to_string(),
            "not-a-check".to_string(),
        ])
        .with_exclude(vec!["meta-title".to_string()]);
    assert_eq!(
        registry.active_ids(),
        vec!["content-length", "performance-ttfb"]
    );
}

#[test]
fn score_result_json_shape() {
    let result = score(vec![Stub::new("a", 1.0, true), Stub::new("b", 1.0, false)]);
    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(json["url"], "https://example.com/");
    assert_eq!(json["score"], 50.0);
    assert_eq!(json["checks"][0]["id"], "a");
    assert_eq!(json["checks"][0]["result"], true);
    assert_eq!(json["checks"][1]["failureReason"], "stub failure");
    assert_eq!(json["checks"][1]["timeToFix"], 0);
}
