//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Failures of a single relayed connection.
///
/// None of these reach the client as an HTTP response; the connection
/// handler logs them and drops the connection.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Request line did not contain a method and a target
    #[error("Malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// Method other than GET
    #[error("Method not implemented: {0}")]
    UnsupportedMethod(String),

    /// Port text in the request target is not a valid u16
    #[error("Invalid port in request target: {0:?}")]
    InvalidPort(String),

    /// Client header block exceeded the size cap
    #[error("Header block exceeds {limit} bytes")]
    HeadersTooLarge { limit: usize },

    /// Origin server could not be reached
    #[error("Failed to connect to origin {host}:{port}: {source}")]
    OriginConnect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Read or write failure on either side of the relay
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Cache Error Enum ==
/// Refusals reported by the object cache.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    /// Object exceeds the single-object limit
    #[error("Object of {size} bytes exceeds maximum object size of {max} bytes")]
    ObjectTooLarge { size: usize, max: usize },

    /// Object can never fit, even in an empty cache
    #[error("Object of {size} bytes exceeds cache capacity of {capacity} bytes")]
    CacheFull { size: usize, capacity: usize },
}

// == API Error Enum ==
/// Errors returned by the admin API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// URI not present in the cache
    #[error("Not cached: {0}")]
    NotFound(String),

    /// Invalid query parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for relay operations.
pub type Result<T> = std::result::Result<T, ProxyError>;
