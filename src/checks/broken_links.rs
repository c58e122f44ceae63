//! Broken link check
//!
//! Probes every distinct http(s) link on the page through the fetcher's
//! memoised status lookup. Without a fetcher nothing is probed.

use crate::checks::base::{CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
use crate::models::Priority;
use anyhow::Result;
use indexmap::IndexSet;
use serde_json::Value;
use tracing::debug;

const DEFAULT_MAX_LINKS: usize = 100;

pub struct BrokenLinksCheck {
    descriptor: CheckDescriptor,
    max_links: usize,
}

impl BrokenLinksCheck {
    pub const ID: CheckId = "content-broken-links";

    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(config: &CheckConfig) -> Self {
        Self {
            descriptor: CheckDescriptor::new("The page contains no broken links")
                .with_priority(Priority::Medium)
                .with_time_to_fix(15)
                .with_weight(5.0),
            max_links: config.get_option_or("max_links", DEFAULT_MAX_LINKS),
        }
    }
}

impl Default for BrokenLinksCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckUnit for BrokenLinksCheck {
    fn id(&self) -> CheckId {
        Self::ID
    }

    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
        let Some(fetcher) = page.fetcher() else {
            return Ok(CheckOutcome::Pass);
        };

        let mut links: IndexSet<String> = page
            .document()
            .links()
            .into_iter()
            .map(|mut url| {
                url.set_fragment(None);
                url.to_string()
            })
            .collect();
        if links.len() > self.max_links {
            debug!(
                "Probing first {} of {} links on {}",
                self.max_links,
                links.len(),
                page.url()
            );
            links.truncate(self.max_links);
        }

        let broken: Vec<Value> = links
            .iter()
            .filter(|url| fetcher.is_broken_link(url))
            .map(|url| Value::from(url.as_str()))
            .collect();

        if broken.is_empty() {
            return Ok(CheckOutcome::Pass);
        }

        Ok(CheckOutcome::fail_with(
            format!("{} broken link(s) found", broken.len()),
            Value::Array(Vec::new()),
            broken,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_server::{serve, Route};
    use crate::http::{FetchOptions, Fetcher, Response};
    use std::collections::HashMap;

    #[test]
    fn test_without_fetcher_passes() {
        let page = Page::new(Response::new(
            200,
            "https://example.com/",
            r#"<a href="/missing">x</a>"#,
        ));
        assert!(BrokenLinksCheck::new().evaluate(&page).expect("evaluate").is_pass());
    }

    #[test]
    fn test_reports_broken_links_once() {
        let server = serve(HashMap::from([("/ok", Route::ok("fine"))]));
        let fetcher = Fetcher::new(FetchOptions::default());
        let html = r##"<a href="/ok">a</a><a href="/gone">b</a><a href="/gone#top">c</a>"##;
        let page = Page::new(Response::new(200, server.url("/"), html)).with_fetcher(&fetcher);

        let outcome = BrokenLinksCheck::new().evaluate(&page).expect("evaluate");
        match outcome {
            CheckOutcome::Fail { actual, .. } => {
                assert_eq!(actual, Some(serde_json::json!([server.url("/gone")])));
            }
            CheckOutcome::Pass => panic!("expected failure"),
        }
    }
}
