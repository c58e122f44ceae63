//! Indexability check
//!
//! A page is excluded from search results by `noindex` (or `none`) in a
//! robots meta tag or in the `X-Robots-Tag` response header.

use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

const ROBOTS_META_NAMES: &[&str] = &["robots", "googlebot"];

pub struct NoIndexCheck {
    descriptor: CheckDescriptor,
}

impl NoIndexCheck {
    pub const ID: CheckId = "meta-no-index";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(_config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The page can be indexed by search engines")
                .with_priority(Priority::High)
                .with_time_to_fix(5)
                .with_weight(10.0),
        }
    }
}

impl Default for NoIndexCheck {
    fn default() -> Self {
        Self::new()
    }
}

fn forbids_indexing(directives: &str) -> bool {
    directives
        .split(|c| c == ',' || c == ':')
        .map(|d| d.trim().to_ascii_lowercase())
        .any(|d| d == "noindex" || d == "none")
}

impl CheckUnit for NoIndexCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        if let Some(header) = page.response().header("x-robots-tag") {
            if forbids_indexing(header) {
                return Ok(CheckOutcome::fail_with(
                    "The X-Robots-Tag header prevents indexing",
                    "index",
                    header,
                ));
            }
        }

        let document = page.document();
        for name in ROBOTS_META_NAMES {
            if let Some(content) = document.meta_name(name) {
                if forbids_indexing(&content) {
                    return Ok(CheckOutcome::fail_with(
                        format!("The {} meta tag prevents indexing", name),
                        "index",
                        content,
                    ));
                }
            }
        }

        Ok(CheckOutcome::Pass)
    }
}
