//! Page audits
//!
//! `Auditor::check` fetches one URL and runs the active checks against
//! it. `Auditor::scan_all` does the same for every configured URL on a
//! rayon pool. Each run gets fresh check instances and its own context;
//! only the fetcher (and its lookup cache) is shared.

use crate::checks::{CheckRegistry, Page};
use crate::config::{ConfigError, SeoConfig};
use crate::http::{Fetcher, Response};
use crate::pipeline;
use crate::scoring::{score_run, ScoreResult};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Progress callback: (url, finished, total)
pub type ProgressCallback = Box<dyn Fn(&str, usize, usize) + Send + Sync>;

/// A URL a scan could not audit
#[derive(Debug, Clone)]
pub struct ScanFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of a full scan
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Scored pages in configured order
    pub results: Vec<ScoreResult>,
    /// Pages whose fetch failed
    pub failures: Vec<ScanFailure>,
    pub duration: Duration,
}

impl ScanSummary {
    /// Mean score over audited pages, `None` when nothing was audited
    pub fn average_score(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let total: f64 = self.results.iter().map(|r| r.score).sum();
        Some((total / self.results.len() as f64 * 100.0).round() / 100.0)
    }
}

pub struct Auditor {
    config: SeoConfig,
    registry: CheckRegistry,
    fetcher: Fetcher,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Auditor {
    /// Build an auditor with a fetcher configured from `config`
    pub fn new(config: SeoConfig) -> Result<Self, ConfigError> {
        let fetcher = Fetcher::new(config.fetch_options()?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: SeoConfig, fetcher: Fetcher) -> Self {
        let registry = CheckRegistry::from_config(&config);
        let workers = config.scan.workers;
        Self {
            config,
            registry,
            fetcher,
            workers,
            progress_callback: None,
        }
    }

    /// Number of pages audited in parallel (0 = auto-detect)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &SeoConfig {
        &self.config
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Fetch `url` and run every active check against it
    pub fn check(&self, url: &str) -> Result<ScoreResult> {
        info!("Checking {}", url);
        let response = self
            .fetcher
            .fetch(url)
            .with_context(|| format!("Failed to fetch {}", url))?;
        Ok(self.check_response(url, response))
    }

    /// Run every active check against an already fetched response
    pub fn check_response(&self, url: &str, response: Response) -> ScoreResult {
        let checks = self.registry.list_active_checks();
        let page = Page::new(response).with_fetcher(&self.fetcher);

        let start = Instant::now();
        let ctx = pipeline::run(&checks, page);
        if ctx.exited() {
            debug!("Run for {} stopped early after a fatal failure", url);
        }
        let result = score_run(url, ctx);

        debug!(
            "{} scored {}% ({} of {} checks passed) in {:?}",
            url,
            result.score,
            result.passed().count(),
            result.checks.len(),
            start.elapsed()
        );
        result
    }

    /// Audit every configured URL
    pub fn scan_all(&self) -> Result<ScanSummary> {
        self.scan(&self.config.urls)
    }

    /// Audit `urls` in parallel. Results keep the input order.
    pub fn scan(&self, urls: &[String]) -> Result<ScanSummary> {
        let start = Instant::now();
        let total = urls.len();
        let workers = if self.workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16)
        } else {
            self.workers
        };

        info!("Scanning {} URLs with {} workers", total, workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;

        let finished = AtomicUsize::new(0);
        let outcomes: Vec<(String, Result<ScoreResult>)> = pool.install(|| {
            urls.par_iter()
                .map(|url| {
                    let outcome = self.check(url);
                    let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(callback) = &self.progress_callback {
                        callback(url, done, total);
                    }
                    (url.clone(), outcome)
                })
                .collect()
        });

        let mut summary = ScanSummary::default();
        for (url, outcome) in outcomes {
            match outcome {
                Ok(result) => summary.results.push(result),
                Err(e) => {
                    warn!("Skipping {}: {:#}", url, e);
                    summary.failures.push(ScanFailure {
                        url,
                        error: format!("{:#}", e),
                    });
                }
            }
        }
        summary.duration = start.elapsed();

        info!(
            "Scanned {} URLs ({} failed) in {:?}",
            total,
            summary.failures.len(),
            summary.duration
        );
        Ok(summary)
    }
}
