//! Cache observability counters.
//!
//! The counters live for the whole process and are only reset by a restart.
//! They are injected into the cache as a shared handle instead of living in
//! ambient globals, so tests can observe a cache in isolation. Monitoring
//! reads them through the accessors; nothing in the cache ever branches on
//! them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Atomic hit/miss/write counters for a direct cache.
///
/// Thread-safe; share via `Arc` between the cache, bulk importers and any
/// monitoring endpoint.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    writes: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    hit_nanos: AtomicU64,
    miss_nanos: AtomicU64,
}

impl CacheMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cache hit and the time the read took.
    pub fn record_hit(&self, elapsed: Duration) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.hit_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Records a cache miss and the time the read took.
    pub fn record_miss(&self, elapsed: Duration) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.miss_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Records one record written to the disk cache.
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of records written since process startup.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of cache hits since process startup.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of cache misses since process startup.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of direct cache reads from disk, hits and misses combined.
    /// Useful for trie debugging, not much else.
    pub fn reads(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// Total time spent serving hits.
    pub fn hit_time(&self) -> Duration {
        Duration::from_nanos(self.hit_nanos.load(Ordering::Relaxed))
    }

    /// Total time spent serving misses.
    pub fn miss_time(&self) -> Duration {
        Duration::from_nanos(self.miss_nanos.load(Ordering::Relaxed))
    }

    /// Fraction of reads served from the disk cache.
    pub fn hit_ratio(&self) -> f64 {
        let reads = self.reads();
        if reads == 0 {
            0.0
        } else {
            self.hits() as f64 / reads as f64
        }
    }
}
