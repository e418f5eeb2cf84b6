//! Error types for the catalog client.
//!
//! # Design
//! A non-2xx response carries only its status code, and its `Display` is the
//! bare decimal code (`"404"`), so views can show or match on it directly.
//! `status()` and `is_not_found()` expose the code without string parsing.
//! Network failures keep the underlying `reqwest::Error` intact.

use thiserror::Error;

/// Errors returned by the transport, the fetchers and the `parse_*` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status outside 200..=299. The body is not read.
    #[error("{status}")]
    Status { status: u16 },

    /// DNS, connection refused, aborted request and other network failures.
    #[error("transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON for the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A caller-supplied header name or value is not valid on the wire.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

impl ApiError {
    /// HTTP status code, when the error came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
