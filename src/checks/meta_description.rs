use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

/// Fails when the page has no non-empty `<meta name="description">`
pub struct DescriptionCheck {
    descriptor: CheckDescriptor,
}

impl DescriptionCheck {
    pub const ID: CheckId = "meta-description";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(_config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The page has a meta description")
                .with_priority(Priority::Medium)
                .with_time_to_fix(5)
                .with_weight(5.0),
        }
    }
}

impl Default for DescriptionCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for DescriptionCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        if page.response().body.trim().is_empty() {
            return Ok(CheckOutcome::Pass);
        }
        match page.document().meta_name("description") {
            Some(description) if !description.is_empty() => Ok(CheckOutcome::Pass),
            _ => Ok(CheckOutcome::fail("The page has no meta description")),
        }
    }
}
