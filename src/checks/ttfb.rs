use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

const DEFAULT_MAX_MS: u64 = 600;

/// Fails when the server took too long to start answering
pub struct TtfbCheck {
    descriptor: CheckDescriptor,
    max_ms: u64,
}

impl TtfbCheck {
    pub const ID: CheckId = "performance-ttfb";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(config: &CheckConfig) -> Self {
        let max_ms = config.get_option_or("max_ms", DEFAULT_MAX_MS);
        Self {
            descriptor: CheckDescriptor::new(format!(
                "The time to first byte is below {} ms",
                max_ms
            ))
            .with_priority(Priority::Medium)
            .with_time_to_fix(120)
            .with_weight(3.0),
            max_ms,
        }
    }
}

impl Default for TtfbCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for TtfbCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        let elapsed = page.response().elapsed.as_millis() as u64;
        // Responses built without a measured timing report zero
        if elapsed <= self.max_ms {
            return Ok(CheckOutcome::Pass);
        }
        Ok(CheckOutcome::fail_with(
            "The server responded too slowly",
            self.max_ms,
            elapsed,
        ))
    }
}
