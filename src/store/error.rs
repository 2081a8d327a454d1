//! Store error type

use thiserror::Error;

// == Store Error ==
/// Failure reported by a key-value backend.
///
/// The tagged cache never catches or rewraps these; they reach the caller as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Backend refused the operation (bad key, oversized value, ...)
    #[error("Store rejected operation: {0}")]
    Rejected(String),

    /// Backend is at capacity and could not make room
    #[error("Store full: {0}")]
    Full(String),
}
