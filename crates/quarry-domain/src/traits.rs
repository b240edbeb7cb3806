//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the document-shaping logic and
//! infrastructure. Implementations live in other crates.

use crate::Document;
use async_trait::async_trait;

/// Trait for text embedding models
///
/// Implemented by the infrastructure layer (quarry-embed)
#[async_trait]
pub trait Embeddings: Send + Sync {
    /// Error type for embedding operations
    type Error;

    /// Embed a search query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, Self::Error>;

    /// Dimension of the vectors produced by this model
    fn dimension(&self) -> usize;
}

/// Trait for splitting long text into chunks
///
/// Implemented by the application layer (quarry-extractor)
pub trait TextSplitter {
    /// Split text into chunks
    fn split_text(&self, text: &str) -> Vec<String>;

    /// Split every document, one output document per chunk
    ///
    /// Each chunk keeps a copy of its source document's metadata.
    fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.text)
                    .into_iter()
                    .map(move |chunk| Document::new(chunk, doc.metadata.clone()))
            })
            .collect()
    }
}

/// Trait for sources of documents
///
/// Implemented by loaders (quarry-contentful)
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Error type for load operations
    type Error;

    /// Load all documents
    async fn load(&self) -> Result<Vec<Document>, Self::Error>;

    /// Load all documents, then split them
    async fn load_and_split(
        &self,
        splitter: &(dyn TextSplitter + Sync),
    ) -> Result<Vec<Document>, Self::Error> {
        let documents = self.load().await?;
        Ok(splitter.split_documents(&documents))
    }
}

/// Trait for retrieving documents relevant to a query
///
/// Implemented by vector stores (quarry-opensearch)
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Error type for retrieval operations
    type Error;

    /// Retrieve documents relevant to `query`
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>, Self::Error>;
}
