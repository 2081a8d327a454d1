//! API Module
//!
//! HTTP handlers and routing for the cache administration API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `DELETE /prefix/:prefix` - Invalidate all tracked keys under a prefix
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
