//! LRU Tracker Module
//!
//! Least-recently-used ordering for store eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access recency of store keys.
///
/// Every touch stamps the key with a fresh tick; the smallest tick is the
/// least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Next tick to hand out
    clock: u64,
    /// Tick -> key, ordered oldest first
    by_tick: BTreeMap<u64, String>,
    /// Key -> current tick
    ticks: HashMap<String, u64>,
}

impl LruTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if unknown.
    pub fn touch(&mut self, key: &str) {
        let tick = self.clock;
        self.clock += 1;

        if let Some(old) = self.ticks.insert(key.to_string(), tick) {
            self.by_tick.remove(&old);
        }
        self.by_tick.insert(tick, key.to_string());
    }

    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_tick.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.by_tick.values().next().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ticks.contains_key(key)
    }
}
