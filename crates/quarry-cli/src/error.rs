//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Loader error
    #[error(transparent)]
    Contentful(#[from] quarry_contentful::ContentfulError),

    /// Vector store error
    #[error(transparent)]
    OpenSearch(#[from] quarry_opensearch::OpenSearchError),

    /// Embedding model error
    #[error("Embedding error: {0}")]
    Embed(#[from] quarry_embed::EmbedError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
