//! Scan command - audit every configured URL

use crate::audit::{Auditor, ScanSummary};
use crate::config::SeoConfig;
use crate::jobs::{JobQueue, ScanJob};
use crate::reporters::{report_scan, OutputFormat};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

pub fn run(config: SeoConfig, format: OutputFormat, queued: bool) -> Result<()> {
    if config.urls.is_empty() {
        anyhow::bail!("No URLs to scan. Add `urls = [...]` to seo.toml");
    }

    let bar = ProgressBar::new(config.urls.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓▒░  "),
    );
    let progress = bar.clone();
    let auditor = Auditor::new(config)?.with_progress(Box::new(move |url, done, _| {
        progress.set_position(done as u64);
        progress.set_message(url.to_string());
    }));

    let summary = if queued {
        run_queued(auditor)?
    } else {
        auditor.scan_all()?
    };
    bar.finish_and_clear();

    println!("{}", report_scan(&summary, format)?);
    Ok(())
}

fn run_queued(auditor: Auditor) -> Result<ScanSummary> {
    let queue = JobQueue::new(ScanJob::QUEUE);
    let summary = queue.dispatch(ScanJob::new(auditor))?.wait()?;
    queue.shutdown();
    Ok(summary)
}
