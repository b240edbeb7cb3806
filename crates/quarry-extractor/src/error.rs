//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while preparing an extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

/// Why a node, field or embedded object produced no text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Rich-text node without a `content` array
    MissingContent,
    /// Embedded node without a `data.target`
    MissingTarget,
    /// Embedded target or entry without `sys`
    MissingSys,
    /// Asset without `fields.file.url`
    AssetWithoutFile,
}

/// A recoverable failure: the caller renders it as empty text and logs it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason:?}: {detail}")]
pub struct Skip {
    /// Category of the failure
    pub reason: SkipReason,

    /// Human-readable context (node type, entry id, ...)
    pub detail: String,
}

impl Skip {
    /// Create a new skip
    pub fn new(reason: SkipReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}
