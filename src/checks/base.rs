//! Base check trait and types
//!
//! This module defines the core abstractions for page auditing:
//! - `CheckUnit` trait that all checks implement
//! - `CheckDescriptor` static metadata used for scoring and reporting
//! - `CheckOutcome` returned by every evaluation
//! - `Page` the shared, lazily derived view of a fetched response

use crate::extract::{extract_readable_text, parse_document, DocumentTree};
use crate::http::{Fetcher, Response};
use crate::models::{CheckResult, Priority};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;

/// Stable identity of a check, used as result key and in config lists
pub type CheckId = &'static str;

/// Grouping that fixes the run order of checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Response,
    Meta,
    Content,
    Performance,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Response => "response",
            Category::Meta => "meta",
            Category::Content => "content",
            Category::Performance => "performance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static metadata of a check. Never depends on the page being checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckDescriptor {
    pub title: String,
    pub priority: Priority,
    #[serde(rename = "timeToFix")]
    pub time_to_fix_minutes: u32,
    pub score_weight: f64,
    pub continue_after_failure: bool,
}

impl CheckDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: Priority::Low,
            time_to_fix_minutes: 0,
            score_weight: 1.0,
            continue_after_failure: true,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_time_to_fix(mut self, minutes: u32) -> Self {
        self.time_to_fix_minutes = minutes;
        self
    }

    /// Weight in the score; must be positive
    pub fn with_weight(mut self, weight: f64) -> Self {
        debug_assert!(weight > 0.0, "score weight must be positive");
        self.score_weight = weight;
        self
    }

    /// Stop the run when this check fails
    pub fn fatal(mut self) -> Self {
        self.continue_after_failure = false;
        self
    }
}

/// Result of evaluating one check against one page
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Pass,
    Fail {
        reason: Option<String>,
        expected: Option<Value>,
        actual: Option<Value>,
    },
}

impl CheckOutcome {
    pub fn fail(reason: impl Into<String>) -> Self {
        CheckOutcome::Fail {
            reason: Some(reason.into()),
            expected: None,
            actual: None,
        }
    }

    pub fn fail_with(
        reason: impl Into<String>,
        expected: impl Into<Value>,
        actual: impl Into<Value>,
    ) -> Self {
        CheckOutcome::Fail {
            reason: Some(reason.into()),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass)
    }

    pub fn into_result(self) -> CheckResult {
        match self {
            CheckOutcome::Pass => CheckResult::passed(),
            CheckOutcome::Fail {
                reason,
                expected,
                actual,
            } => CheckResult::failed(reason, expected, actual),
        }
    }
}

/// Per-check options, read from the `[thresholds.<id>]` config tables
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    pub options: HashMap<String, Value>,
}

impl CheckConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom option
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Get a typed option value
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get an option with a default value
    pub fn get_option_or<T: serde::de::DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_option(key).unwrap_or(default)
    }
}

/// A fetched page plus artifacts derived from it on first use.
///
/// Readable text and the parsed document are computed at most once per
/// run and shared by every check. A `Page` belongs to a single run and
/// is not shared across threads.
pub struct Page<'a> {
    response: Response,
    fetcher: Option<&'a Fetcher>,
    readable: OnceCell<Option<String>>,
    document: OnceCell<DocumentTree>,
}

impl<'a> Page<'a> {
    pub fn new(response: Response) -> Self {
        Self {
            response,
            fetcher: None,
            readable: OnceCell::new(),
            document: OnceCell::new(),
        }
    }

    /// Attach a fetcher for secondary lookups (link status, remote size)
    pub fn with_fetcher(mut self, fetcher: &'a Fetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Effective URL after redirects
    pub fn url(&self) -> &str {
        &self.response.url
    }

    pub fn readable_text(&self) -> Option<&str> {
        self.readable
            .get_or_init(|| extract_readable_text(&self.response))
            .as_deref()
    }

    pub fn document(&self) -> &DocumentTree {
        self.document.get_or_init(|| parse_document(&self.response))
    }

    pub fn fetcher(&self) -> Option<&'a Fetcher> {
        self.fetcher
    }
}

/// Trait for all page checks
///
/// A check inspects a page and reports whether it passes one rule. It
/// holds no per-run state: everything it learns about a page lives in
/// the returned outcome.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct HasCanonicalCheck {
///     descriptor: CheckDescriptor,
/// }
///
/// impl CheckUnit for HasCanonicalCheck {
///     fn id(&self) -> CheckId {
///         "meta-canonical"
///     }
///
///     fn descriptor(&self) -> &CheckDescriptor {
///         &self.descriptor
///     }
///
///     fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome> {
///         if page.document().select("link[rel=canonical]").is_empty() {
///             return Ok(CheckOutcome::fail("No canonical link"));
///         }
///         Ok(CheckOutcome::Pass)
///     }
/// }
/// ```
pub trait CheckUnit: Send + Sync {
    /// Unique identifier, e.g. `"content-length"`
    fn id(&self) -> CheckId;

    /// Static metadata for scoring and reporting
    fn descriptor(&self) -> &CheckDescriptor;

    /// Evaluate the rule against a page.
    ///
    /// Content that cannot be obtained (no body, nothing extractable,
    /// no fetcher for secondary lookups) counts as a pass. An `Err` is
    /// recorded by the pipeline as an internal error.
    fn evaluate(&self, page: &Page<'_>) -> Result<CheckOutcome>;
}
