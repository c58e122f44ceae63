//! Check pipeline
//!
//! A run is a fold of the ordered checks over a [`RunContext`]:
//!
//! ```text
//! RunContext::new(page) ──step(check 1)──▶ ctx ──step(check 2)──▶ ... ──▶ ctx
//! ```
//!
//! `step` owns all bookkeeping: it evaluates the check, records exactly
//! one result under the check's id, converts errors and panics into an
//! `internal error` failure, and raises the exit flag when a fatal check
//! fails. Once exit is raised every later step is a no-op apart from
//! removing a stale entry for the skipped check.

use crate::checks::{CheckDescriptor, CheckId, CheckUnit, Page};
use crate::models::CheckResult;
use indexmap::IndexMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// A check that ran, with the metadata needed to score and report it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCheck {
    pub descriptor: CheckDescriptor,
    pub result: CheckResult,
}

/// State of one run. Owned by a single thread; never shared.
pub struct RunContext<'a> {
    page: Page<'a>,
    results: IndexMap<CheckId, RecordedCheck>,
    exit: bool,
}

impl<'a> RunContext<'a> {
    pub fn new(page: Page<'a>) -> Self {
        Self {
            page,
            results: IndexMap::new(),
            exit: false,
        }
    }

    pub fn page(&self) -> &Page<'a> {
        &self.page
    }

    /// Recorded checks in execution order
    pub fn results(&self) -> &IndexMap<CheckId, RecordedCheck> {
        &self.results
    }

    pub fn get(&self, id: &str) -> Option<&RecordedCheck> {
        self.results.get(id)
    }

    /// Whether a fatal failure stopped the run
    pub fn exited(&self) -> bool {
        self.exit
    }

    pub fn into_results(self) -> IndexMap<CheckId, RecordedCheck> {
        self.results
    }
}

/// Run `checks` in order against `page`
pub fn run<'a>(checks: &[Arc<dyn CheckUnit>], page: Page<'a>) -> RunContext<'a> {
    checks
        .iter()
        .fold(RunContext::new(page), |ctx, check| step(ctx, check.as_ref()))
}

/// Advance a run by one check
pub fn step<'a>(mut ctx: RunContext<'a>, check: &dyn CheckUnit) -> RunContext<'a> {
    let id = check.id();

    if ctx.exit {
        ctx.results.shift_remove(id);
        debug!("Skipping check {} after fatal failure", id);
        return ctx;
    }

    let start = Instant::now();
    let evaluated = catch_unwind(AssertUnwindSafe(|| check.evaluate(&ctx.page)));

    let result = match evaluated {
        Ok(Ok(outcome)) => outcome.into_result(),
        Ok(Err(e)) => {
            warn!("Check {} failed on {}: {:#}", id, ctx.page.url(), e);
            CheckResult::internal_error()
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!("Check {} panicked on {}: {}", id, ctx.page.url(), message);
            CheckResult::internal_error()
        }
    };

    debug!(
        "Check {} {} in {:?}",
        id,
        if result.result { "passed" } else { "failed" },
        start.elapsed()
    );

    let descriptor = check.descriptor();
    if !result.result && !descriptor.continue_after_failure {
        debug!("Check {} is fatal; stopping run", id);
        ctx.exit = true;
    }

    ctx.results.insert(
        id,
        RecordedCheck {
            descriptor: descriptor.clone(),
            result,
        },
    );
    ctx
}
