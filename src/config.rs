//! Configuration Module
//!
//! Loads server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::tagged::DEFAULT_TTL_SECS;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the in-memory store can hold
    pub max_entries: usize,
    /// TTL in seconds applied when a write does not specify one
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum store entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: DEFAULT_TTL_SECS,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
