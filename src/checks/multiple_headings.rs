use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;

/// Fails when a page has more than one `<h1>`
pub struct MultipleHeadingsCheck {
    descriptor: CheckDescriptor,
}

impl MultipleHeadingsCheck {
    pub const ID: CheckId = "content-multiple-headings";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(_config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The page has at most one h1 heading")
                .with_priority(Priority::Low)
                .with_time_to_fix(5)
                .with_weight(3.0),
        }
    }
}

impl Default for MultipleHeadingsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for MultipleHeadingsCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        let count = page.document().headings(1).len();
        if count <= 1 {
            return Ok(CheckOutcome::Pass);
        }
        Ok(CheckOutcome::fail_with(
            "The page has multiple h1 headings",
            1,
            count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;

    fn evaluate(html: &str) -> CheckOutcome {
        let page = Page::new(Response::new(200, "https://example.com/", html));
        MultipleHeadingsCheck::new().evaluate(&page).expect("evaluate")
    }

    #[test]
    fn test_heading_counts() {
        assert!(evaluate("<p>none</p>").is_pass());
        assert!(evaluate("<h1>One</h1><h2>Sub</h2>").is_pass());
        assert_eq!(
            evaluate("<h1>One</h1><h1>Two</h1>"),
            CheckOutcome::fail_with("The page has multiple h1 headings", 1, 2)
        );
    }
}
