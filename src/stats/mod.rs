use chrono::{DateTime, Duration, Utc};
use log::info;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Counters for one crawl run.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Every response received, whatever its status.
    pub fetches: usize,
    pub fetches_ok: usize,
    /// Responses with status 400 or above.
    pub fetches_failed: usize,
    /// Pages that never reached a parse result: transport error, error status or bad markup.
    pub pages_failed: usize,
    pub bytes_received: usize,
    pub by_status: BTreeMap<u16, usize>,
    pub mean_latency_ms: f64,
}

impl CrawlStats {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            fetches: 0,
            fetches_ok: 0,
            fetches_failed: 0,
            pages_failed: 0,
            bytes_received: 0,
            by_status: BTreeMap::new(),
            mean_latency_ms: 0.0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.finished_at
            .unwrap_or_else(Utc::now)
            .signed_duration_since(self.started_at)
    }
}

/// Shared handle over [`CrawlStats`]; clones update the same counters.
#[derive(Debug, Clone)]
pub struct StatsTracker {
    inner: Arc<RwLock<CrawlStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(CrawlStats::new())),
        }
    }

    pub fn record_fetch(&self, status: u16, bytes: usize, latency: Duration) {
        let mut stats = self.inner.write();
        stats.fetches += 1;
        if status >= 400 {
            stats.fetches_failed += 1;
        } else {
            stats.fetches_ok += 1;
        }
        *stats.by_status.entry(status).or_default() += 1;
        stats.bytes_received += bytes;

        // running mean, so no per-fetch history is kept
        let n = stats.fetches as f64;
        let latency_ms = latency.num_milliseconds() as f64;
        stats.mean_latency_ms += (latency_ms - stats.mean_latency_ms) / n;
    }

    pub fn record_failed_page(&self) {
        self.inner.write().pages_failed += 1;
    }

    pub fn finish(&self) {
        self.inner.write().finished_at = Some(Utc::now());
    }

    pub fn snapshot(&self) -> CrawlStats {
        self.inner.read().clone()
    }

    pub fn log_summary(&self, spider: &str) {
        let stats = self.inner.read();
        let statuses = stats
            .by_status
            .iter()
            .map(|(status, count)| format!("{}x{}", status, count))
            .collect::<Vec<_>>()
            .join(" ");

        info!(
            "{} finished in {}s: {} fetches ({} ok, {} failed), {} pages failed",
            spider,
            stats.elapsed().num_seconds(),
            stats.fetches,
            stats.fetches_ok,
            stats.fetches_failed,
            stats.pages_failed
        );
        info!(
            "{} received {:.1} KiB, mean latency {:.0}ms, statuses [{}]",
            spider,
            stats.bytes_received as f64 / 1024.0,
            stats.mean_latency_ms,
            statuses
        );
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
