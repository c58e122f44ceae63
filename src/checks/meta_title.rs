//! Title tag checks: presence and length

use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

const DEFAULT_MAX_LENGTH: usize = 60;

pub struct TitleCheck {
    descriptor: CheckDescriptor,
}

impl TitleCheck {
    pub const ID: CheckId = "meta-title";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(_config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The page has a title")
                .with_priority(Priority::High)
                .with_time_to_fix(5)
                .with_weight(10.0),
        }
    }
}

impl Default for TitleCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for TitleCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        if page.response().body.trim().is_empty() || page.document().title().is_some() {
            return Ok(CheckOutcome::Pass);
        }
        Ok(CheckOutcome::fail("The page has no title"))
    }
}

pub struct TitleLengthCheck {
    descriptor: CheckDescriptor,
    max_length: usize,
}

impl TitleLengthCheck {
    pub const ID: CheckId = "meta-title-length";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(config: &CheckConfig) -> Self {
        let max_length = config.get_option_or("max_length", DEFAULT_MAX_LENGTH);
        Self {
            descriptor: CheckDescriptor::new(format!(
                "The title is not longer than {} characters",
                max_length
            ))
            .with_priority(Priority::Medium)
            .with_time_to_fix(1)
            .with_weight(5.0),
            max_length,
        }
    }
}

impl Default for TitleLengthCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for TitleLengthCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        let Some(title) = page.document().title() else {
            return Ok(CheckOutcome::Pass);
        };
        let length = title.chars().count();
        if length <= self.max_length {
            return Ok(CheckOutcome::Pass);
        }
        Ok(CheckOutcome::fail_with(
            "The title is too long",
            self.max_length,
            length,
        ))
    }
}
