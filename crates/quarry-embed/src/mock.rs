//! Deterministic embedding model for tests
//!
//! Vectors are derived by hashing the text with one seed per dimension and
//! normalizing to unit length, so equal texts always embed identically and
//! no model files or network are needed.

use crate::EmbedError;
use async_trait::async_trait;
use quarry_domain::Embeddings;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hash-based embedding model
///
/// Clones share the call counter.
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dimension: usize,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockEmbeddingModel {
    /// Create a model producing vectors of `dimension` values
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A model whose every call fails
    pub fn failing(dimension: usize) -> Self {
        Self {
            fail: true,
            ..Self::new(dimension)
        }
    }

    /// Number of `embed_query` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Embed synchronously
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if text.is_empty() {
            return Err(EmbedError::InvalidInput("Empty text cannot be embedded".to_string()));
        }

        let mut vector: Vec<f32> = (0..self.dimension as u64)
            .map(|seed| hash_with_seed(text, seed))
            .collect();

        let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            vector.iter_mut().for_each(|x| *x /= magnitude);
        }
        Ok(vector)
    }
}

/// Map `hash(text, seed)` into `[-1, 1]`
fn hash_with_seed(text: &str, seed: u64) -> f32 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    seed.hash(&mut hasher);
    ((hasher.finish() as f64 / u64::MAX as f64) * 2.0 - 1.0) as f32
}

#[async_trait]
impl Embeddings for MockEmbeddingModel {
    type Error = EmbedError;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbedError::Communication("Mock embedding failure".to_string()));
        }
        self.embed(text)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosine_similarity;

    #[tokio::test]
    async fn test_deterministic() {
        let model = MockEmbeddingModel::new(64);
        let a = model.embed_query("The quick brown fox").await.unwrap();
        let b = model.embed_query("The quick brown fox").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_dimension_and_unit_length() {
        let model = MockEmbeddingModel::new(128);
        let v = model.embed_query("test text").await.unwrap();
        assert_eq!(v.len(), 128);
        assert_eq!(model.dimension(), 128);
        let magnitude: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_different_texts_differ() {
        let model = MockEmbeddingModel::new(256);
        let a = model.embed("hello world").unwrap();
        let b = model.embed("goodbye world").unwrap();
        assert_ne!(a, b);
        assert!(cosine_similarity(&a, &b) < 0.9);
    }

    #[test]
    fn test_empty_text_rejected() {
        let model = MockEmbeddingModel::new(16);
        let err = model.embed("").unwrap_err();
        assert!(matches!(err, EmbedError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_failing_model_counts_calls() {
        let model = MockEmbeddingModel::failing(16);
        let shared = model.clone();
        assert!(model.embed_query("anything").await.is_err());
        assert_eq!(shared.call_count(), 1);
    }
}
