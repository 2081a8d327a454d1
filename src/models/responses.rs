//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::store::{CacheStats, CachedValue};

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: CachedValue,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: CachedValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /set
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /del/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /prefix/:prefix
#[derive(Debug, Clone, Serialize)]
pub struct ClearPrefixResponse {
    /// The prefix that was cleared
    pub prefix: String,
    /// Number of tracked keys removed
    pub cleared: usize,
}

impl ClearPrefixResponse {
    pub fn new(prefix: impl Into<String>, cleared: usize) -> Self {
        Self {
            prefix: prefix.into(),
            cleared,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of store hits
    pub hits: u64,
    /// Number of store misses
    pub misses: u64,
    /// Number of LRU evictions
    pub evictions: u64,
    /// Entries currently held by the store
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Keys currently tracked for prefix invalidation
    pub tracked_keys: usize,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, tracked_keys: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            tracked_keys,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
