//! Tagged Cache Module
//!
//! Wraps a [`KeyValueStore`] with an index of the keys written through it,
//! which adds prefix-based bulk invalidation on top of plain get/set/delete.

mod index;


use std::future::Future;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::store::{CachedValue, KeyValueStore, StoreError};

pub use index::KeyIndex;

/// TTL applied by `set` when the caller does not pass one.
pub const DEFAULT_TTL_SECS: u64 = 60;

// == Tagged Cache ==
/// TTL cache that remembers its own keys.
///
/// Reads and writes go straight to the store. Every successful `set` also
/// records the key in a [`KeyIndex`], so [`clear_by_prefix`](Self::clear_by_prefix)
/// can delete all entries under a prefix without the store supporting
/// pattern deletion.
///
/// Store errors are returned unchanged. Nothing is retried.
#[derive(Debug)]
pub struct TaggedCache<S> {
    store: S,
    index: KeyIndex,
    default_ttl: u64,
}

impl<S: KeyValueStore> TaggedCache<S> {
    // == Constructors ==
    /// Creates a tagged cache over `store` with a 60 second default TTL.
    pub fn new(store: S) -> Self {
        Self::with_default_ttl(store, DEFAULT_TTL_SECS)
    }

    /// Creates a tagged cache with a custom default TTL in seconds.
    pub fn with_default_ttl(store: S, default_ttl: u64) -> Self {
        Self {
            store,
            index: KeyIndex::new(),
            default_ttl,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Get ==
    /// Reads `key` from the store. A missing key is `Ok(None)`.
    pub async fn get(&self, key: &str) -> Result<Option<CachedValue>, StoreError> {
        self.store.get(key).await
    }

    // == Set ==
    /// Writes `value` under `key` and starts tracking the key.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - Opaque payload, passed to the store untouched
    /// * `ttl` - Optional TTL in seconds (uses the default TTL if None)
    ///
    /// The key is tracked only after the store write succeeds.
    pub async fn set(
        &self,
        key: &str,
        value: CachedValue,
        ttl: Option<u64>,
    ) -> Result<(), StoreError> {
        let ttl_secs = ttl.unwrap_or(self.default_ttl);
        self.store.set(key, value, ttl_secs).await?;
        self.index.insert(key);

        debug!(key, ttl_secs, "Cached key");
        Ok(())
    }

    // == Delete ==
    /// Deletes `key` from the store and stops tracking it.
    ///
    /// Deleting a key that does not exist succeeds.
    pub async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.store.del(key).await?;
        self.index.remove(key);

        debug!(key, "Deleted cached key");
        Ok(())
    }

    // == Clear By Prefix ==
    /// Deletes every tracked key that starts with `prefix`.
    ///
    /// The prefix is matched literally. Matching keys are claimed from the
    /// index up front and deleted concurrently; the call returns once every
    /// delete has finished. Keys whose delete failed go back into the index
    /// and the first failure is returned.
    ///
    /// Returns the number of keys cleared.
    pub async fn clear_by_prefix(&self, prefix: &str) -> Result<usize, StoreError> {
        let claimed = self.index.take_prefixed(prefix);
        if claimed.is_empty() {
            debug!(prefix, "No cached keys under prefix");
            return Ok(0);
        }

        let results = join_all(claimed.iter().map(|key| self.store.del(key))).await;

        let mut cleared = 0;
        let mut first_error = None;
        for (key, result) in claimed.iter().zip(results) {
            match result {
                Ok(()) => cleared += 1,
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to delete cached key");
                    self.index.insert(key);
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        info!(prefix, cleared, "Cleared cached keys by prefix");
        Ok(cleared)
    }

    // == Get Or Set ==
    /// Returns the cached value for `key`, loading and caching it on a miss.
    ///
    /// Loader errors are returned as-is and nothing is cached.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<u64>,
        load: F,
    ) -> Result<CachedValue, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedValue, E>>,
        E: From<StoreError>,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(value);
        }

        let value = load().await?;
        self.set(key, value.clone(), ttl).await?;
        Ok(value)
    }

    // == Index Views ==
    /// Sorted snapshot of the tracked keys.
    pub fn tracked_keys(&self) -> Vec<String> {
        self.index.snapshot()
    }

    pub fn tracked_len(&self) -> usize {
        self.index.len()
    }

    pub fn is_tracked(&self, key: &str) -> bool {
        self.index.contains(key)
    }
}
