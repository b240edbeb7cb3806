//! Quarry Embedding Layer
//!
//! Implementations of the [`Embeddings`](quarry_domain::Embeddings) trait used to
//! turn search questions into query vectors.
//!
//! # Models
//!
//! - `MockEmbeddingModel`: deterministic hash-based vectors for testing
//! - `OllamaEmbeddings`: local Ollama `/api/embeddings` endpoint
//!
//! # Examples
//!
//! ```
//! use quarry_embed::MockEmbeddingModel;
//! use quarry_domain::Embeddings;
//!
//! # async fn example() {
//! let model = MockEmbeddingModel::new(8);
//! let vector = model.embed_query("what is quarry?").await.unwrap();
//! assert_eq!(vector.len(), 8);
//! # }
//! ```

#![warn(missing_docs)]

pub mod mock;
pub mod ollama;

use thiserror::Error;

pub use mock::MockEmbeddingModel;
pub use ollama::OllamaEmbeddings;

/// Errors that can occur while embedding text
#[derive(Error, Debug)]
pub enum EmbedError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response did not contain a usable vector
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available on the server
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Input rejected before any request
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for EmbedError {
    fn from(e: reqwest::Error) -> Self {
        EmbedError::Communication(e.to_string())
    }
}

/// Cosine similarity in `[-1, 1]`
///
/// Vectors of different lengths, or with zero magnitude, score `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_cosine_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-4);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
