//! Error types for the OpenSearch connector

use thiserror::Error;

/// Errors that can occur while querying an index
#[derive(Error, Debug)]
pub enum OpenSearchError {
    /// Non-success response from the cluster
    #[error("OpenSearch error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error reason from the body, or the raw body
        message: String,
    },

    /// Network or TLS failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The question could not be embedded
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Search values or configuration rejected
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for OpenSearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            OpenSearchError::InvalidResponse(e.to_string())
        } else {
            OpenSearchError::Connection(e.to_string())
        }
    }
}

impl From<serde_json::Error> for OpenSearchError {
    fn from(e: serde_json::Error) -> Self {
        OpenSearchError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
