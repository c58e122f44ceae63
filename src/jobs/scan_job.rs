use super::Job;
use crate::audit::{Auditor, ScanSummary};
use crate::config::{ConfigError, SeoConfig};
use std::time::Duration;
use tracing::info;

/// Full scan of every configured URL
pub struct ScanJob {
    auditor: Auditor,
}

impl ScanJob {
    pub const QUEUE: &'static str = "seo";
    pub const TRIES: u32 = 1;
    pub const TIMEOUT: Duration = Duration::from_secs(3 * 60 * 60);

    pub fn new(auditor: Auditor) -> Self {
        Self { auditor }
    }

    pub fn from_config(config: SeoConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(Auditor::new(config)?))
    }
}

impl Job for ScanJob {
    type Output = ScanSummary;

    fn name(&self) -> &'static str {
        "ScanJob"
    }

    fn queue(&self) -> &'static str {
        Self::QUEUE
    }

    fn tries(&self) -> u32 {
        Self::TRIES
    }

    fn timeout(&self) -> Duration {
        Self::TIMEOUT
    }

    fn handle(&mut self) -> anyhow::Result<ScanSummary> {
        info!(
            "Running scheduled scan of {} URLs",
            self.auditor.config().urls.len()
        );
        self.auditor.scan_all()
    }
}
