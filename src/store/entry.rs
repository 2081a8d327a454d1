//! Store Entry Module
//!
//! A single stored value together with its expiry metadata.

use chrono::Utc;

use crate::store::CachedValue;

// == Store Entry ==
/// Represents a single entry held by the in-memory store.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: CachedValue,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_secs` from now.
    ///
    /// A TTL of zero produces an entry that never expires.
    pub fn new(value: CachedValue, ttl_secs: u64) -> Self {
        let now = current_timestamp_ms();
        let expires_at = (ttl_secs > 0).then(|| now.saturating_add(ttl_secs.saturating_mul(1000)));

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_with_ttl() {
        let entry = StoreEntry::new(json!("value"), 60);

        assert_eq!(entry.value, json!("value"));
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_zero_ttl_never_expires() {
        let entry = StoreEntry::new(json!({"id": 1}), 0);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining_ms().is_none());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoreEntry::new(json!("value"), 1);
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining_ms(), Some(0));
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = StoreEntry::new(json!("value"), 10);

        let remaining = entry.ttl_remaining_ms().unwrap();
        assert!(remaining <= 10_000);
        assert!(remaining >= 9_000);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = StoreEntry {
            value: json!(null),
            created_at: now,
            expires_at: Some(now),
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
