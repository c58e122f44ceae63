//! Open Graph image check
//!
//! Requires an `og:image` meta property whose target resolves and is no
//! larger than `max_bytes`. The image is only probed when a fetcher is
//! attached to the page.

use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::extract::absolutize_url;
use crate::http::is_broken_status;
use crate::models::{format_bytes, Priority};
use anyhow::Result;

/// Largest image most social platforms accept
const DEFAULT_MAX_BYTES: u64 = 8_000_000;

pub struct OpenGraphImageCheck {
    descriptor: CheckDescriptor,
    max_bytes: u64,
}

impl OpenGraphImageCheck {
    pub const ID: CheckId = "meta-open-graph-image";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The page has a working Open Graph image")
                .with_priority(Priority::Low)
                .with_time_to_fix(10)
                .with_weight(3.0),
            max_bytes: config.get_option_or("max_bytes", DEFAULT_MAX_BYTES),
        }
    }
}

impl Default for OpenGraphImageCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for OpenGraphImageCheck {
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

        let image = match page.document().meta_property("og:image") {
            Some(image) if !image.is_empty() => image,
            _ => return Ok(CheckOutcome::fail("The page has no og:image")),
        };

        let Some(fetcher) = page.fetcher() else {
            return Ok(CheckOutcome::Pass);
        };

        let url = absolutize_url(&image, page.url());
        let status = fetcher.remote_status(&url);
        if is_broken_status(status) {
            return Ok(CheckOutcome::fail_with(
                format!("The og:image {} is broken", url),
                200,
                status,
            ));
        }

        let size = fetcher.remote_size(&url);
        if size > self.max_bytes {
            return Ok(CheckOutcome::fail_with(
                format!(
                    "The og:image is {}, larger than {}",
                    format_bytes(size),
                    format_bytes(self.max_bytes)
                ),
                self.max_bytes,
                size,
            ));
        }
        Ok(CheckOutcome::Pass)
    }
}
