//! Tagged Cache - TTL caching with prefix-based invalidation
//!
//! Wraps any key-value store that offers get/set/delete with per-key expiry
//! and adds "delete every key under this prefix", backed by an index of the
//! keys written through the cache. Ships with an in-memory TTL/LRU store and
//! an HTTP admin API.

pub mod api;
pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod store;
pub mod tagged;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use store::{CachedValue, KeyValueStore, SharedMemoryStore, StoreError};
pub use tagged::TaggedCache;
pub use tasks::spawn_cleanup_task;
