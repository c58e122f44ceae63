//! Memoisation for secondary lookups
//!
//! Status codes and remote sizes are cached forever per URL string. The
//! cache is shared by every run of a scan, so a link that appears on many
//! pages is only requested once.

use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe URL-keyed cache
#[derive(Clone, Default)]
pub struct FetchCache {
    statuses: Arc<DashMap<String, u16>>,
    sizes: Arc<DashMap<String, u64>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached status for `url`, computing it with `fetch` on a miss.
    ///
    /// The shard lock is not held while `fetch` runs; two racing misses for
    /// the same URL may both fetch, and the first stored value wins.
    pub fn status_or_insert_with(&self, url: &str, fetch: impl FnOnce() -> u16) -> u16 {
        if let Some(status) = self.statuses.get(url) {
            return *status;
        }
        let status = fetch();
        *self.statuses.entry(url.to_string()).or_insert(status)
    }

    /// Cached size for `url`, computing it with `fetch` on a miss
    pub fn size_or_insert_with(&self, url: &str, fetch: impl FnOnce() -> u64) -> u64 {
        if let Some(size) = self.sizes.get(url) {
            return *size;
        }
        let size = fetch();
        *self.sizes.entry(url.to_string()).or_insert(size)
    }
}
