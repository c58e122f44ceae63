//! Response status check
//!
//! Every other check assumes a page was actually served, so a non-2xx
//! status ends the run.

use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

pub struct ResponseStatusCheck {
    descriptor: CheckDescriptor,
}

impl ResponseStatusCheck {
    pub const ID: CheckId = "response-status";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(_config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The page responds with a successful status code")
                .with_priority(Priority::High)
                .with_time_to_fix(10)
                .with_weight(10.0)
                .fatal(),
        }
    }
}

impl Default for ResponseStatusCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for ResponseStatusCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        let status = page.response().status;
        if page.response().is_success() {
            return Ok(CheckOutcome::Pass);
        }
        Ok(CheckOutcome::fail_with(
            format!("The page responded with status {}", status),
            "2xx",
            status,
        ))
    }
}
