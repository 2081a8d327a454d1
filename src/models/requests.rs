//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::store::{CachedValue, MAX_KEY_LENGTH};

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds (uses the cache default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: CachedValue,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "types:list", "value": ["FIRE", "WATER"]}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "types:list");
        assert_eq!(req.value, json!(["FIRE", "WATER"]));
        assert!(req.ttl.is_none());
    }

    #[test]
    fn test_set_request_with_ttl() {
        let json = r#"{"key": "test", "value": "hello", "ttl": 60}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl, Some(60));
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            value: json!("test"),
            ttl: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_long_key() {
        let req = SetRequest {
            key: "k".repeat(MAX_KEY_LENGTH + 1),
            value: json!(null),
            ttl: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "valid_key".to_string(),
            value: json!({"id": 1}),
            ttl: Some(60),
        };
        assert!(req.validate().is_none());
    }
}
