//! In-Memory Store Module
//!
//! HashMap-backed store with TTL expiry and LRU eviction, plus a shareable
//! handle that implements [`KeyValueStore`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{
    CacheStats, CachedValue, KeyValueStore, LruTracker, StoreEntry, StoreError, MAX_KEY_LENGTH,
    MAX_VALUE_SIZE,
};

// == Memory Store ==
/// Single-owner TTL store with a fixed entry capacity.
#[derive(Debug)]
pub struct MemoryStore {
    entries: HashMap<String, StoreEntry>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
}

impl MemoryStore {
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous entry and resetting its TTL.
    ///
    /// When the store is full and `key` is new, the least recently used
    /// entry is evicted first.
    pub fn set(&mut self, key: &str, value: CachedValue, ttl_secs: u64) -> Result<(), StoreError> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(StoreError::Rejected(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        let encoded_len = serde_json::to_vec(&value)
            .map_err(|e| StoreError::Rejected(format!("Value is not encodable: {}", e)))?
            .len();
        if encoded_len > MAX_VALUE_SIZE {
            return Err(StoreError::Rejected(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            let evicted = self
                .lru
                .evict_oldest()
                .ok_or_else(|| StoreError::Full("No entry available for eviction".to_string()))?;
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, "Evicted least recently used entry");
        }

        self.entries.insert(key.to_string(), StoreEntry::new(value, ttl_secs));
        self.lru.touch(key);

        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// Expired entries are dropped on access and count as a miss.
    pub fn get(&mut self, key: &str) -> Option<CachedValue> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            Some(_) => {
                self.remove_entry(key);
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Removes `key`, returning whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Cleanup Expired ==
    /// Removes every expired entry and returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }

        expired.len()
    }

    /// Returns a snapshot of the store counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            ..self.stats.clone()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }
}

// == Shared Memory Store ==
/// Cloneable handle to a [`MemoryStore`] behind an async read-write lock.
#[derive(Debug, Clone)]
pub struct SharedMemoryStore {
    inner: Arc<RwLock<MemoryStore>>,
}

impl SharedMemoryStore {
    pub fn new(max_entries: usize) -> Self {
        Self::from_store(MemoryStore::new(max_entries))
    }

    pub fn from_store(store: MemoryStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Runs an expiry sweep under the write lock.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for SharedMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CachedValue>, StoreError> {
        // Write lock: reads update LRU order and counters.
        Ok(self.inner.write().await.get(key))
    }

    async fn set(&self, key: &str, value: CachedValue, ttl_secs: u64) -> Result<(), StoreError> {
        self.inner.write().await.set(key, value, ttl_secs)
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.inner.write().await.delete(key);
        Ok(())
    }
}
