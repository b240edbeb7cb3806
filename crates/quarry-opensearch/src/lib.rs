//! OpenSearch vector store connector
//!
//! Queries an index whose documents were upserted elsewhere. A question is
//! embedded, the nearest documents are fetched with a k-NN query and hits
//! below the configured minimum score are dropped.
//!
//! ```
//! use quarry_opensearch::OpenSearchConfig;
//!
//! let config = OpenSearchConfig::new("search.internal:9200", "docs");
//! assert_eq!(config.base_url(), "https://search.internal:9200");
//! assert_eq!(config.top_k, 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod retriever;
mod store;

pub use config::{OpenSearchConfig, SearchValues, DEFAULT_TOP_K};
pub use error::OpenSearchError;
pub use retriever::{descriptor, OpenSearchRetriever};
pub use store::{
    documents_to_text, filter_by_score, search_body, OpenSearchStore, ScoredDocument,
    DEFAULT_TIMEOUT_SECS, VECTOR_FIELD,
};
