//! k-NN search against an existing index
//!
//! Documents are expected in the layout produced by an upsert: the text
//! under `text`, the metadata object under `metadata` and the vector under
//! `embedding`.

use crate::config::OpenSearchConfig;
use crate::error::OpenSearchError;
use quarry_domain::{Document, Embeddings, Metadata};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, warn};

/// Request timeout for search calls (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Field holding the document vector
pub const VECTOR_FIELD: &str = "embedding";

/// A retrieved document and its relevance score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    /// The stored document
    pub document: Document,
    /// `_score` reported by the cluster
    pub score: f64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitList,
}

#[derive(Debug, Deserialize)]
struct HitList {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source", default)]
    source: HitSource,
}

#[derive(Debug, Default, Deserialize)]
struct HitSource {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

impl From<Hit> for ScoredDocument {
    fn from(hit: Hit) -> Self {
        Self {
            document: Document::new(
                hit.source.text.unwrap_or_default(),
                hit.source.metadata.unwrap_or_default(),
            ),
            score: hit.score.unwrap_or(0.0),
        }
    }
}

/// Vector store over one existing index
#[derive(Debug, Clone)]
pub struct OpenSearchStore<E> {
    http: reqwest::Client,
    base_url: String,
    index_name: String,
    username: Option<String>,
    password: Option<String>,
    embeddings: E,
}

impl<E> OpenSearchStore<E>
where
    E: Embeddings,
    E::Error: Display,
{
    /// Connect to the index named in `config`
    pub fn new(config: &OpenSearchConfig, embeddings: E) -> Result<Self, OpenSearchError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            index_name: config.index_name.clone(),
            username: config.username.clone().filter(|u| !u.is_empty()),
            password: config.password.clone(),
            embeddings,
        })
    }

    /// Name of the searched index
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// The model used to embed questions
    pub fn embeddings(&self) -> &E {
        &self.embeddings
    }

    fn search_url(&self) -> String {
        format!("{}/{}/_search", self.base_url, self.index_name)
    }

    /// Embed `question` and return the `k` nearest documents with their scores
    ///
    /// Each `filter` entry must match the document's metadata value exactly.
    pub async fn similarity_search_with_score(
        &self,
        question: &str,
        k: usize,
        filter: &Metadata,
    ) -> Result<Vec<ScoredDocument>, OpenSearchError> {
        let vector = self
            .embeddings
            .embed_query(question)
            .await
            .map_err(|e| OpenSearchError::Embedding(e.to_string()))?;

        let url = self.search_url();
        debug!(url = %url, k, filters = filter.len(), "Searching index");

        let mut request = self.http.post(&url).json(&search_body(&vector, k, filter));
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), index = %self.index_name, "Search failed");
            return Err(OpenSearchError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.hits.hits.into_iter().map(ScoredDocument::from).collect())
    }
}

/// Body of a k-NN search for `vector`
///
/// Without a filter the query is a bare `knn` clause; with one, the `knn`
/// clause is wrapped in a `bool` query whose filter requires a `match` on
/// `metadata.<key>` for every entry.
pub fn search_body(vector: &[f32], k: usize, filter: &Metadata) -> Value {
    let knn = json!({ "knn": { VECTOR_FIELD: { "vector": vector, "k": k } } });
    if filter.is_empty() {
        return json!({ "size": k, "query": knn });
    }

    let terms: Vec<Value> = filter
        .iter()
        .map(|(key, value)| json!({ "match": { format!("metadata.{}", key): value } }))
        .collect();

    json!({
        "size": k,
        "query": {
            "bool": {
                "filter": { "bool": { "must": terms } },
                "must": [knn]
            }
        }
    })
}

/// Drop hits scoring below `threshold`, keeping order
pub fn filter_by_score(hits: Vec<ScoredDocument>, threshold: Option<f64>) -> Vec<Document> {
    hits.into_iter()
        .filter(|hit| threshold.map_or(true, |min| hit.score >= min))
        .map(|hit| hit.document)
        .collect()
}

/// One line per document: the `text` metadata value, or the document text
pub fn documents_to_text(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| format!("{}\n", doc.metadata_str("text").unwrap_or(&doc.text)))
        .collect()
}

/// `error.reason` of an OpenSearch error body, or the raw body
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    match value.get("error") {
        Some(Value::String(reason)) => reason.clone(),
        Some(error) => error
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        None => body.to_string(),
    }
}
