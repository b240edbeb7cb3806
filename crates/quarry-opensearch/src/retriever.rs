//! Retriever and node surface over an [`OpenSearchStore`]

use crate::config::{OpenSearchConfig, SearchValues};
use crate::error::OpenSearchError;
use crate::store::{documents_to_text, filter_by_score, OpenSearchStore};
use async_trait::async_trait;
use quarry_domain::{
    Document, Embeddings, InputParam, Metadata, NodeDescriptor, NodeOutput, OutputKind, ParamKind,
    Retriever,
};
use std::fmt::Display;
use tracing::info;

/// Top-K search with an optional score threshold
#[derive(Debug, Clone)]
pub struct OpenSearchRetriever<E> {
    store: OpenSearchStore<E>,
    top_k: usize,
    threshold: Option<f64>,
    filter: Metadata,
}

impl<E> OpenSearchRetriever<E>
where
    E: Embeddings,
    E::Error: Display,
{
    /// Build the store and retriever from one config
    pub fn from_config(config: &OpenSearchConfig, embeddings: E) -> Result<Self, OpenSearchError> {
        Ok(Self {
            store: OpenSearchStore::new(config, embeddings)?,
            top_k: config.top_k,
            threshold: config.score_threshold(),
            filter: Metadata::new(),
        })
    }

    /// Restrict every retrieval to documents matching `filter`
    pub fn with_filter(mut self, filter: Metadata) -> Self {
        self.filter = filter;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &OpenSearchStore<E> {
        &self.store
    }

    /// Search and apply the score threshold
    ///
    /// Hits keep the order the cluster returned them in.
    pub async fn search(&self, question: &str, filter: &Metadata) -> Result<Vec<Document>, OpenSearchError> {
        let hits = self
            .store
            .similarity_search_with_score(question, self.top_k, filter)
            .await?;
        let received = hits.len();
        let documents = filter_by_score(hits, self.threshold);
        info!(
            index = self.store.index_name(),
            received,
            kept = documents.len(),
            "Retrieved documents"
        );
        Ok(documents)
    }

    /// Answer one node invocation
    ///
    /// Text output is a single string with one line per kept hit.
    pub async fn run(&self, values: &SearchValues, output: OutputKind) -> Result<NodeOutput, OpenSearchError> {
        let documents = self.search(&values.question, &values.filter).await?;
        Ok(match output {
            OutputKind::Documents => NodeOutput::Documents(documents),
            OutputKind::Text => NodeOutput::Text(vec![documents_to_text(&documents)]),
        })
    }
}

#[async_trait]
impl<E> Retriever for OpenSearchRetriever<E>
where
    E: Embeddings,
    E::Error: Display,
{
    type Error = OpenSearchError;

    async fn retrieve(&self, query: &str) -> Result<Vec<Document>, Self::Error> {
        self.search(query, &self.filter).await
    }
}

/// Registration record for the load-existing-index node
pub fn descriptor() -> NodeDescriptor {
    let mut node = NodeDescriptor::new(
        "openSearchExistingIndex-v2",
        "OpenSearch Load Existing Index - V2",
        "Vector Stores",
        "Load existing index from OpenSearch (i.e: Document has been upserted)",
        1.0,
    );

    node.add_input(InputParam::new("Embeddings", "embeddings", ParamKind::Connection));
    node.add_input(
        InputParam::new("OpenSearch URL", "opensearchURL", ParamKind::String)
            .with_default("localhost:9200"),
    );
    node.add_input(InputParam::new("OpenSearch Username", "opensearchUsername", ParamKind::String).optional());
    node.add_input(InputParam::new("OpenSearch Password", "opensearchPassword", ParamKind::String).optional());
    node.add_input(InputParam::new("Index Name", "indexName", ParamKind::String));
    node.add_input(
        InputParam::new("Top K", "topK", ParamKind::Number)
            .with_default(crate::config::DEFAULT_TOP_K)
            .optional()
            .additional()
            .with_description("Number of top results to fetch. Default to 4"),
    );
    node.add_input(
        InputParam::new("Minimum Score (%)", "minScore", ParamKind::Number)
            .optional()
            .additional()
            .with_description("Minimum score for embeddings documents to be included"),
    );
    node.add_input(
        InputParam::new("Values", "values", ParamKind::Json)
            .with_description("Search values: question and an optional metadata filter"),
    );

    node.add_output("document", "OpenSearch Document", OutputKind::Documents);
    node.add_output("text", "OpenSearch Text", OutputKind::Text);
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor() {
        let node = descriptor();
        assert_eq!(node.name, "openSearchExistingIndex-v2");
        assert_eq!(node.category, "Vector Stores");
        assert_eq!(node.input("topK").and_then(|i| i.default.clone()), Some(serde_json::json!(4)));
        assert!(node.input("minScore").is_some_and(|i| i.optional));
        assert_eq!(node.output_kind("text"), Some(OutputKind::Text));
        assert_eq!(node.output_kind("document"), Some(OutputKind::Documents));
    }
}
