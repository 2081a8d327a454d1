//! Error types for the cache server
//!
//! Maps cache and store failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::store::StoreError;

// == Cache Error Enum ==
/// Error type returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not present in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failure reported by the backing store
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Store(StoreError::Rejected(_)) => StatusCode::BAD_REQUEST,
            CacheError::Store(StoreError::Full(_) | StoreError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (
                StoreError::Rejected("too long".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::Full("no room".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                StoreError::Unavailable("down".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_store_error_message_is_preserved() {
        let error: CacheError = StoreError::Unavailable("connection refused".into()).into();
        assert_eq!(error.to_string(), "Store unavailable: connection refused");
    }
}
