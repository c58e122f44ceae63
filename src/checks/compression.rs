use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

const ENCODINGS: &[&str] = &["gzip", "br", "deflate", "zstd"];

/// Fails when the HTML is served without content encoding
pub struct CompressionCheck {
    descriptor: CheckDescriptor,
}

impl CompressionCheck {
    pub const ID: CheckId = "performance-compression";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(_config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The HTML is served compressed")
                .with_priority(Priority::Medium)
                .with_time_to_fix(15)
                .with_weight(3.0),
        }
    }
}

impl Default for CompressionCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for CompressionCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        if page.response().body.is_empty() {
            return Ok(CheckOutcome::Pass);
        }

        let encoding = page
            .response()
            .header("content-encoding")
            .unwrap_or_default()
            .to_ascii_lowercase();
        let compressed = encoding
            .split(',')
            .map(str::trim)
            .any(|e| ENCODINGS.contains(&e));
        if compressed {
            return Ok(CheckOutcome::Pass);
        }

        Ok(CheckOutcome::fail_with(
            "The HTML is not compressed",
            ENCODINGS.join(", "),
            encoding,
        ))
    }
}
