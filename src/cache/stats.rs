//! Cache Statistics Module
//!
//! Tracks interception outcomes and cache lifecycle counters.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Requests answered from the current generation
    pub hits: u64,
    /// Requests with no match in the current generation
    pub misses: u64,
    /// Requests forwarded to the network
    pub network_fetches: u64,
    /// Responses written into a generation
    pub writes: u64,
    /// Network requests that failed outright
    pub network_failures: u64,
    /// Offline payloads synthesized for API requests
    pub offline_fallbacks: u64,
    /// Stale generations deleted by activation
    pub generations_deleted: u64,
    /// Current number of entries across all generations
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
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

    pub fn record_network_fetch(&mut self) {
        self.network_fetches += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_network_failure(&mut self) {
        self.network_failures += 1;
    }

    pub fn record_offline_fallback(&mut self) {
        self.offline_fallbacks += 1;
    }

    pub fn record_generations_deleted(&mut self, count: usize) {
        self.generations_deleted += count as u64;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
