//! Store Statistics Module

use serde::Serialize;

// == Cache Stats ==
/// Hit/miss/eviction counters for the in-memory store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// Entries currently held
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
