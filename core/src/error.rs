//! Error types for the Petfinder client.
//!
//! # Design
//! One enum covers every failure a call can surface. `Unauthorized` is split
//! out of `Http` because it is the one status the async layer reacts to (it
//! drops the cached token). Everything is returned to the caller as-is; the
//! client never retries.

use thiserror::Error;

/// Message used when a request produced neither data nor a transport error
/// description.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Errors returned by `PetfinderClient` and `PetfinderApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL could not be joined with an endpoint path.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request never produced a usable response: transport failure or
    /// an empty body.
    #[error("network error: {0}")]
    Network(String),

    /// The body was not valid JSON or did not match the expected schema.
    #[error("decode error: {0}")]
    Decode(String),

    /// A listing call was made before any token was cached.
    #[error("token not available")]
    TokenUnavailable,

    /// The server rejected the bearer token (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The server returned a non-2xx status other than 401.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The key-value store could not persist a change.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}
