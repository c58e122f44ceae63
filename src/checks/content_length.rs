//! Content length check
//!
//! Fails when the readable main text of a page is shorter than a minimum
//! number of characters. Pages without extractable content pass.

use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

const DEFAULT_MIN_LENGTH: usize = 2100;

pub struct ContentLengthCheck {
    descriptor: CheckDescriptor,
    min_length: usize,
}

impl ContentLengthCheck {
    pub const ID: CheckId = "content-length";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(config: &CheckConfig) -> Self {
        let min_length = config.get_option_or("min_length", DEFAULT_MIN_LENGTH);
        Self {
            descriptor: CheckDescriptor::new(format!(
                "Length of the content is at least {} characters",
                min_length
            ))
            .with_priority(Priority::Low)
            .with_time_to_fix(30)
            .with_weight(5.0),
            min_length,
        }
    }
}

impl Default for ContentLengthCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for ContentLengthCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        let Some(text) = page.readable_text() else {
            return Ok(CheckOutcome::Pass);
        };

        let length = text.chars().count();
        if length >= self.min_length {
            return Ok(CheckOutcome::Pass);
        }

        Ok(CheckOutcome::fail_with(
            "The length of the content is too short",
            self.min_length,
            length,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;

    fn page_with_paragraph(chars: usize) -> Page<'static> {
        let body = format!("<html><body><p>{}</p></body></html>", "a".repeat(chars));
        Page::new(Response::new(200, "https://example.com/", body))
    }

    #[test]
    fn test_passes_at_threshold() {
        let outcome = ContentLengthCheck::new()
            .evaluate(&page_with_paragraph(2100))
            .expect("evaluate");
        assert!(outcome.is_pass());
    }

    #[test]
    fn test_fails_one_below_threshold() {
        let outcome = ContentLengthCheck::new()
            .evaluate(&page_with_paragraph(2099))
            .expect("evaluate");
        assert_eq!(
            outcome,
            CheckOutcome::fail_with("The length of the content is too short", 2100, 2099)
        );
    }

    #[test]
    fn test_passes_without_content() {
        let page = Page::new(Response::new(200, "https://example.com/", ""));
        let outcome = ContentLengthCheck::new().evaluate(&page).expect("evaluate");
        assert!(outcome.is_pass());
    }

    #[test]
    fn test_threshold_from_config() {
        let config = CheckConfig::new().with_option("min_length", serde_json::json!(10));
        let check = ContentLengthCheck::with_config(&config);
        assert!(check.evaluate(&page_with_paragraph(10)).expect("evaluate").is_pass());
        assert_eq!(
            check.descriptor().title,
            "Length of the content is at least 10 characters"
        );
    }

    #[test]
    fn test_descriptor_is_static() {
        let check = ContentLengthCheck::new();
        let d = check.descriptor();
        assert_eq!(d.priority, Priority::Low);
        assert_eq!(d.time_to_fix_minutes, 30);
        assert_eq!(d.score_weight, 5.0);
        assert!(d.continue_after_failure);
    }
}
