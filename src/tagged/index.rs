//! Key Index Module
//!
//! Concurrent set of every key a tagged cache has written.

use dashmap::DashSet;

// == Key Index ==
/// Keys written through a [`TaggedCache`](crate::tagged::TaggedCache) and not
/// yet deleted through it.
///
/// Entries that expired or were evicted in the store stay here until the next
/// `del` or prefix-clear touches them; deleting them again is harmless.
#[derive(Debug, Default)]
pub struct KeyIndex {
    keys: DashSet<String>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key. Returns `false` if it was already tracked.
    pub fn insert(&self, key: &str) -> bool {
        self.keys.insert(key.to_string())
    }

    /// Forgets a key. Returns `false` if it was not tracked.
    pub fn remove(&self, key: &str) -> bool {
        self.keys.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    // == Take Prefixed ==
    /// Removes and returns every tracked key starting with `prefix`.
    ///
    /// Only keys this call actually removed are returned, so concurrent
    /// callers with overlapping prefixes never receive the same key.
    pub fn take_prefixed(&self, prefix: &str) -> Vec<String> {
        let matching: Vec<String> = self
            .keys
            .iter()
            .filter(|key| key.key().starts_with(prefix))
            .map(|key| key.key().clone())
            .collect();

        matching
            .into_iter()
            .filter_map(|key| self.keys.remove(&key))
            .collect()
    }

    /// Returns the tracked keys in sorted order.
    pub fn snapshot(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys.iter().map(|key| key.key().clone()).collect();
        keys.sort();
        keys
    }
}
