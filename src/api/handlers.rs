//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearPrefixResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse,
    StatsResponse,
};
use crate::store::SharedMemoryStore;
use crate::tagged::TaggedCache;

/// Application state shared across all handlers.
///
/// The tagged cache synchronizes internally, so handlers share it through a
/// plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<TaggedCache<SharedMemoryStore>>,
}

impl AppState {
    pub fn new(cache: TaggedCache<SharedMemoryStore>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Builds the in-memory store and tagged cache described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let store = SharedMemoryStore::new(config.max_entries);
        Self::new(TaggedCache::with_default_ttl(store, config.default_ttl))
    }

    /// Handle to the backing store, shared with the cleanup task.
    pub fn store(&self) -> SharedMemoryStore {
        self.cache.store().clone()
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value with optional TTL and tracks the key.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.set(&req.key, req.value, req.ttl).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Succeeds whether or not the key existed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.del(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /prefix/:prefix
///
/// Invalidates every tracked key starting with `prefix`.
pub async fn clear_prefix_handler(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<ClearPrefixResponse>> {
    let cleared = state.cache.clear_by_prefix(&prefix).await?;

    Ok(Json(ClearPrefixResponse::new(prefix, cleared)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.store().stats().await;

    Json(StatsResponse::new(&stats, state.cache.tracked_len()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::new(TaggedCache::new(SharedMemoryStore::new(100)))
    }

    fn set_request(key: &str, value: serde_json::Value) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value,
            ttl: None,
        }
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let req = set_request("test_key", json!({"name": "CHARMANDER"}));
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let response = get_handler(State(state.clone()), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, json!({"name": "CHARMANDER"}));
        assert!(state.cache.is_tracked("test_key"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler_is_idempotent() {
        let state = test_state();

        set_handler(State(state.clone()), Json(set_request("to_delete", json!(1))))
            .await
            .unwrap();

        for _ in 0..2 {
            let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
            assert!(result.is_ok());
        }

        let result = get_handler(State(state), Path("to_delete".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_clear_prefix_handler() {
        let state = test_state();

        for key in ["pokemons:list:a", "pokemons:list:b", "types:list"] {
            set_handler(State(state.clone()), Json(set_request(key, json!(key))))
                .await
                .unwrap();
        }

        let response = clear_prefix_handler(State(state.clone()), Path("pokemons:list".to_string()))
            .await
            .unwrap();
        assert_eq!(response.cleared, 2);
        assert_eq!(state.cache.tracked_keys(), vec!["types:list"]);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        set_handler(State(state.clone()), Json(set_request("k", json!(1))))
            .await
            .unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.total_entries, 1);
        assert_eq!(response.tracked_keys, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state();

        let result = set_handler(State(state), Json(set_request("", json!("value")))).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_from_config_uses_default_ttl() {
        let config = Config {
            default_ttl: 120,
            ..Config::default()
        };

        let state = AppState::from_config(&config);
        assert_eq!(state.cache.default_ttl(), 120);
    }
}
