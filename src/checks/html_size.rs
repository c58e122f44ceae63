use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::{format_bytes, Priority};
use anyhow::Result;

const DEFAULT_MAX_BYTES: u64 = 100_000;

/// Fails when the HTML document itself exceeds a size budget
pub struct HtmlSizeCheck {
    descriptor: CheckDescriptor,
    max_bytes: u64,
}

impl HtmlSizeCheck {
    pub const ID: CheckId = "performance-html-size";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(config: &CheckConfig) -> Self {
        let max_bytes = config.get_option_or("max_bytes", DEFAULT_MAX_BYTES);
        Self {
            descriptor: CheckDescriptor::new(format!(
                "The HTML is not larger than {}",
                format_bytes(max_bytes)
            ))
            .with_priority(Priority::Medium)
            .with_time_to_fix(60)
            .with_weight(3.0),
            max_bytes,
        }
    }
}

impl Default for HtmlSizeCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for HtmlSizeCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        let size = page.response().body.len() as u64;
        if size <= self.max_bytes {
            return Ok(CheckOutcome::Pass);
        }
        Ok(CheckOutcome::fail_with(
            format!("The HTML is {}", format_bytes(size)),
            self.max_bytes,
            size,
        ))
    }
}
