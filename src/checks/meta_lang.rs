use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

/// Fails when the root `<html>` element has no `lang` attribute
pub struct LangCheck {
    descriptor: CheckDescriptor,
}

impl LangCheck {
    pub const ID: CheckId = "meta-lang";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(_config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The page declares its language")
                .with_priority(Priority::Low)
                .with_time_to_fix(1)
                .with_weight(3.0),
        }
    }
}

impl Default for LangCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for LangCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        if page.response().body.trim().is_empty() || page.document().lang().is_some() {
            return Ok(CheckOutcome::Pass);
        }
        Ok(CheckOutcome::fail("The html element has no lang attribute"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;

    fn evaluate(html: &str) -> CheckOutcome {
        let page = Page::new(Response::new(200, "https://example.com/", html));
        LangCheck::new().evaluate(&page).expect("evaluate")
    }

    #[test]
    fn test_lang() {
        assert!(evaluate(r#"<html lang="en"><body></body></html>"#).is_pass());
        assert!(!evaluate("<html><body>hi</body></html>").is_pass());
        assert!(evaluate("").is_pass());
    }
}
