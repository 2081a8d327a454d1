//! Request and Response models for the cache server API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::SetRequest;
pub use responses::{
    ClearPrefixResponse, DeleteResponse, ErrorResponse, GetResponse, HealthResponse, SetResponse,
    StatsResponse,
};
