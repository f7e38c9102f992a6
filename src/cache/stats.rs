//! Cache Statistics Module
//!
//! Tracks hits, misses, builds and the outcome of invalidations and preloads.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing cache behaviour since start-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry
    pub hits: u64,
    /// Lookups that had to build (absent or expired)
    pub misses: u64,
    /// Views built on the lookup path
    pub builds: u64,
    /// Builds that failed, on lookup or during preload
    pub build_failures: u64,
    /// Entries removed by explicit invalidation
    pub invalidations: u64,
    /// Entries dropped because they outlived the expiration window
    pub expirations: u64,
    /// Preloaded views inserted into the cache
    pub preloaded: u64,
    /// Preloaded views rejected as stale or superseded
    pub discarded: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_build(&mut self) {
        self.builds += 1;
    }

    pub fn record_build_failure(&mut self) {
        self.build_failures += 1;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_preloaded(&mut self) {
        self.preloaded += 1;
    }

    pub fn record_discarded(&mut self) {
        self.discarded += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
