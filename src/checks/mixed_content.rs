//! Mixed content check
//!
//! An https page that loads resources over plain http gets them blocked
//! or flagged by browsers.

use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;
use serde_json::Value;

pub struct MixedContentCheck {
    descriptor: CheckDescriptor,
}

impl MixedContentCheck {
    pub const ID: CheckId = "content-mixed-content";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(_config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The page does not load resources over http")
                .with_priority(Priority::High)
                .with_time_to_fix(60)
                .with_weight(5.0),
        }
    }
}

impl Default for MixedContentCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for MixedContentCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        let secure = page
            .document()
            .base_url()
            .is_some_and(|base| base.scheme() == "https");
        if !secure {
            return Ok(CheckOutcome::Pass);
        }

        let insecure: Vec<Value> = page
            .document()
            .resources()
            .into_iter()
            .filter(|url| url.scheme() == "http")
            .map(|url| Value::from(url.to_string()))
            .collect();

        if insecure.is_empty() {
            return Ok(CheckOutcome::Pass);
        }

        Ok(CheckOutcome::fail_with(
            format!("{} resource(s) are loaded over http", insecure.len()),
            Value::Array(Vec::new()),
            insecure,
        ))
    }
}
