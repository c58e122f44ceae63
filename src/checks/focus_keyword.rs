//! Focus keyword check
//!
//! The focus keyword is the first entry of `<meta name="keywords">`. The
//! check fails when there is no such keyword or when the title does not
//! contain it (case-insensitive).

use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

pub struct FocusKeywordInTitleCheck {
    descriptor: CheckDescriptor,
}

impl FocusKeywordInTitleCheck {
    pub const ID: CheckId = "meta-focus-keyword-in-title";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(_config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The focus keyword is in the title")
                .with_priority(Priority::Medium)
                .with_time_to_fix(5)
                .with_weight(5.0),
        }
    }
}

impl Default for FocusKeywordInTitleCheck {
    fn default() -> Self {
        Self::new()
    }
}

fn focus_keyword(keywords: &str) -> Option<String> {
    keywords
        .split(',')
        .map(str::trim)
        .find(|k| !k.is_empty())
        .map(str::to_lowercase)
}

impl CheckUnit for FocusKeywordInTitleCheck {
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

        let document = page.document();
        let Some(keyword) = document.meta_name("keywords").as_deref().and_then(focus_keyword)
        else {
            return Ok(CheckOutcome::fail("The page has no focus keyword"));
        };

        let title = document.title().unwrap_or_default();
        if title.to_lowercase().contains(&keyword) {
            return Ok(CheckOutcome::Pass);
        }

        Ok(CheckOutcome::fail_with(
            "The focus keyword is not in the title",
            keyword,
            title,
        ))
    }
}
