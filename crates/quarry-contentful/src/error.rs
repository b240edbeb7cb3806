//! Error types for the Contentful loader.

use thiserror::Error;

/// Contentful operation errors
#[derive(Debug, Error)]
pub enum ContentfulError {
    /// Non-success response from the API
    #[error("Contentful API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the error body, or the raw body
        message: String,
    },

    /// Connection error (network, DNS, timeout, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing or unusable credentials and options
    #[error("Configuration error: {0}")]
    Config(String),

    /// A page request failed; the whole load is abandoned
    #[error("Failed to fetch entries from Contentful: {0}")]
    Fetch(#[source] Box<ContentfulError>),
}

impl ContentfulError {
    /// Wrap a page failure
    pub fn fetch(cause: ContentfulError) -> Self {
        ContentfulError::Fetch(Box::new(cause))
    }
}

impl From<reqwest::Error> for ContentfulError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ContentfulError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            ContentfulError::Api {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            ContentfulError::Connection(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ContentfulError {
    fn from(e: serde_json::Error) -> Self {
        ContentfulError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
