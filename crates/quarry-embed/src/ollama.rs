//! Ollama embedding model
//!
//! Calls a local Ollama server's `/api/embeddings` endpoint.
//!
//! # Features
//!
//! - Configurable endpoint, model and vector dimension
//! - Retry with exponential backoff on transport errors and 5xx responses
//! - Request timeout
//!
//! # Examples
//!
//! ```no_run
//! use quarry_embed::OllamaEmbeddings;
//! use quarry_domain::Embeddings;
//!
//! # async fn example() -> Result<(), quarry_embed::EmbedError> {
//! let model = OllamaEmbeddings::new("http://localhost:11434", "nomic-embed-text", 768)?;
//! let vector = model.embed_query("how do I deploy?").await?;
//! # Ok(())
//! # }
//! ```

use crate::EmbedError;
use async_trait::async_trait;
use quarry_domain::Embeddings;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default request timeout (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Embedding model served by Ollama
#[derive(Debug, Clone)]
pub struct OllamaEmbeddings {
    endpoint: String,
    model: String,
    dimension: usize,
    client: reqwest::Client,
    max_retries: u32,
    backoff: Duration,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbeddings {
    /// Create a model client
    ///
    /// `endpoint` is the server root, e.g. `http://localhost:11434`.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimension,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Duration::from_secs(1),
        })
    }

    /// Set the number of attempts per request (at least one)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the first backoff delay; later delays double
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = format!("{}/api/embeddings", self.endpoint);
        let body = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let mut last_error = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let delay = self.backoff * 2u32.pow(attempt - 1);
                debug!(attempt, ?delay, "Retrying embedding request");
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(&body).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(attempt, "Embedding request failed: {}", e);
                    last_error = Some(EmbedError::Communication(format!("Request failed: {}", e)));
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
                    EmbedError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                return self.check_dimension(parsed.embedding);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(EmbedError::ModelNotAvailable(self.model.clone()));
            }

            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let error = EmbedError::Communication(format!("HTTP {}: {}", status, message));
            if status.is_client_error() {
                return Err(error);
            }
            warn!(attempt, %status, "Embedding server error");
            last_error = Some(error);
        }

        Err(last_error
            .unwrap_or_else(|| EmbedError::Communication("Max retries exceeded".to_string())))
    }

    fn check_dimension(&self, vector: Vec<f32>) -> Result<Vec<f32>, EmbedError> {
        if vector.is_empty() {
            return Err(EmbedError::InvalidResponse("Empty embedding".to_string()));
        }
        if self.dimension != 0 && vector.len() != self.dimension {
            return Err(EmbedError::InvalidResponse(format!(
                "Expected {} dimensions, got {}",
                self.dimension,
                vector.len()
            )));
        }
        Ok(vector)
    }
}

#[async_trait]
impl Embeddings for OllamaEmbeddings {
    type Error = EmbedError;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        if text.trim().is_empty() {
            return Err(EmbedError::InvalidInput("Empty text cannot be embedded".to_string()));
        }
        self.request(text).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
