//! seo-audit - On-page SEO audits
//!
//! Fetches a page, runs an ordered pipeline of weighted checks against
//! it and reduces the results into a 0-100 score.
//!
//! ```no_run
//! use seo_audit::audit::Auditor;
//! use seo_audit::config::SeoConfig;
//!
//! let auditor = Auditor::new(SeoConfig::default())?;
//! let result = auditor.check("https://example.com/")?;
//! println!("{} - {}%", result.url, result.score);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod audit;
pub mod checks;
pub mod cli;
pub mod config;
pub mod extract;
pub mod http;
pub mod jobs;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
