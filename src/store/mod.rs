//! Store Module
//!
//! The key-value backend boundary used by the tagged cache, plus an
//! in-process TTL store with LRU eviction that implements it.

mod entry;
mod error;
mod lru;
mod memory;
mod stats;


use async_trait::async_trait;

pub use entry::StoreEntry;
pub use error::StoreError;
pub use lru::LruTracker;
pub use memory::{MemoryStore, SharedMemoryStore};
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed encoded value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Opaque payload stored under a cache key.
pub type CachedValue = serde_json::Value;

// == Key-Value Store ==
/// Minimal async key-value backend with per-key expiry.
///
/// A `ttl_secs` of `0` asks the store to keep the entry until it is deleted.
/// `del` must succeed for keys that do not exist.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CachedValue>, StoreError>;

    async fn set(&self, key: &str, value: CachedValue, ttl_secs: u64) -> Result<(), StoreError>;

    async fn del(&self, key: &str) -> Result<(), StoreError>;
}
