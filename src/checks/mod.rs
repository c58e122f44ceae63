//! Page checks
//!
//! This module provides the check framework and the built-in checks run
//! against every audited page.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CheckRegistry                          │
//! │  - Static registration table (id, category, constructor)    │
//! │  - Applies allow-list ("*" = all) then deny-list            │
//! │  - Fresh instances per run, ordered by category then id     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CheckUnit Trait                         │
//! │  - id(): stable key used in results and config              │
//! │  - descriptor(): title, priority, weight, fatal flag        │
//! │  - evaluate(page): Pass or Fail with expected/actual        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Built-in checks
//!
//! ## Response
//! - `response-status` - page answered 2xx (stops the run on failure)
//!
//! ## Meta
//! - `meta-description`, `meta-focus-keyword-in-title`, `meta-lang`,
//!   `meta-no-index`, `meta-open-graph-image`, `meta-title`,
//!   `meta-title-length`
//!
//! ## Content
//! - `content-broken-links`, `content-length`, `content-mixed-content`,
//!   `content-multiple-headings`
//!
//! ## Performance
//! - `performance-compression`, `performance-html-size`,
//!   `performance-ttfb`

mod base;
mod registry;

mod response_status;

mod focus_keyword;
mod meta_description;
mod meta_lang;
mod meta_title;
mod no_index;
mod open_graph_image;

mod broken_links;
mod content_length;
mod mixed_content;
mod multiple_headings;

mod compression;
mod html_size;
mod ttfb;

pub use base::{Category, CheckConfig, CheckDescriptor, CheckId, CheckOutcome, CheckUnit, Page};
pub use registry::{CheckConstructor, CheckRegistration, CheckRegistry};

pub use broken_links::BrokenLinksCheck;
pub use compression::CompressionCheck;
pub use content_length::ContentLengthCheck;
pub use focus_keyword::FocusKeywordInTitleCheck;
pub use html_size::HtmlSizeCheck;
pub use meta_description::DescriptionCheck;
pub use meta_lang::LangCheck;
pub use meta_title::{TitleCheck, TitleLengthCheck};
pub use mixed_content::MixedContentCheck;
pub use multiple_headings::MultipleHeadingsCheck;
pub use no_index::NoIndexCheck;
pub use open_graph_image::OpenGraphImageCheck;
pub use response_status::ResponseStatusCheck;
pub use ttfb::TtfbCheck;

use std::sync::Arc;

/// Registration table of every built-in check
pub fn builtin_checks() -> Vec<CheckRegistration> {
    vec![
        CheckRegistration::new(ResponseStatusCheck::ID, Category::Response, |c| {
            Arc::new(ResponseStatusCheck::with_config(c))
        }),
        // Meta
        CheckRegistration::new(TitleCheck::ID, Category::Meta, |c| {
            Arc::new(TitleCheck::with_config(c))
        }),
        CheckRegistration::new(TitleLengthCheck::ID, Category::Meta, |c| {
            Arc::new(TitleLengthCheck::with_config(c))
        }),
        CheckRegistration::new(DescriptionCheck::ID, Category::Meta, |c| {
            Arc::new(DescriptionCheck::with_config(c))
        }),
        CheckRegistration::new(FocusKeywordInTitleCheck::ID, Category::Meta, |c| {
            Arc::new(FocusKeywordInTitleCheck::with_config(c))
        }),
        CheckRegistration::new(LangCheck::ID, Category::Meta, |c| {
            Arc::new(LangCheck::with_config(c))
        }),
        CheckRegistration::new(NoIndexCheck::ID, Category::Meta, |c| {
            Arc::new(NoIndexCheck::with_config(c))
        }),
        CheckRegistration::new(OpenGraphImageCheck::ID, Category::Meta, |c| {
            Arc::new(OpenGraphImageCheck::with_config(c))
        }),
        // Content
        CheckRegistration::new(ContentLengthCheck::ID, Category::Content, |c| {
            Arc::new(ContentLengthCheck::with_config(c))
        }),
        CheckRegistration::new(MultipleHeadingsCheck::ID, Category::Content, |c| {
            Arc::new(MultipleHeadingsCheck::with_config(c))
        }),
        CheckRegistration::new(MixedContentCheck::ID, Category::Content, |c| {
            Arc::new(MixedContentCheck::with_config(c))
        }),
        CheckRegistration::new(BrokenLinksCheck::ID, Category::Content, |c| {
            Arc::new(BrokenLinksCheck::with_config(c))
        }),
        // Performance
        CheckRegistration::new(HtmlSizeCheck::ID, Category::Performance, |c| {
            Arc::new(HtmlSizeCheck::with_config(c))
        }),
        CheckRegistration::new(CompressionCheck::ID, Category::Performance, |c| {
            Arc::new(CompressionCheck::with_config(c))
        }),
        CheckRegistration::new(TtfbCheck::ID, Category::Performance, |c| {
            Arc::new(TtfbCheck::with_config(c))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_match_instances() {
        for registration in builtin_checks() {
            let check = (registration.build)(&CheckConfig::default());
            assert_eq!(check.id(), registration.id);
            assert!(check.descriptor().score_weight > 0.0);
        }
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let mut ids: Vec<CheckId> = builtin_checks().iter().map(|r| r.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 15);
    }

    #[test]
    fn test_only_response_status_is_fatal() {
        let fatal: Vec<CheckId> = builtin_checks()
            .iter()
            .map(|r| (r.build)(&CheckConfig::default()))
            .filter(|c| !c.descriptor().continue_after_failure)
            .map(|c| c.id())
            .collect();
        assert_eq!(fatal, vec!["response-status"]);
    }
}
