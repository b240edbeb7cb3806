//! Connection settings and per-query search values

use crate::error::OpenSearchError;
use quarry_domain::Metadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default number of neighbours to request
pub const DEFAULT_TOP_K: usize = 4;

/// How to reach one index on an OpenSearch cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSearchConfig {
    /// Cluster address, either `host[:port]` or a full URL
    pub url: String,
    /// Basic auth user, if the cluster requires one
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Index holding the upserted documents
    pub index_name: String,
    /// Number of hits to request
    pub top_k: usize,
    /// Minimum relevance in percent; hits scoring below it are dropped
    pub min_score: Option<f64>,
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            password: None,
            index_name: String::new(),
            top_k: DEFAULT_TOP_K,
            min_score: None,
        }
    }
}

impl OpenSearchConfig {
    /// Config for `index_name` on the cluster at `url`
    pub fn new(url: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            index_name: index_name.into(),
            ..Self::default()
        }
    }

    /// Authenticate with basic auth
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Base URL without a trailing slash
    ///
    /// A bare host is reached over HTTPS.
    pub fn base_url(&self) -> String {
        let url = self.url.trim().trim_end_matches('/');
        if url.contains("://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }

    /// Minimum score as a fraction, if one is set
    ///
    /// Zero disables the threshold.
    pub fn score_threshold(&self) -> Option<f64> {
        self.min_score.filter(|m| *m != 0.0).map(|m| m / 100.0)
    }

    /// Reject configs that cannot produce a request
    pub fn validate(&self) -> Result<(), OpenSearchError> {
        if self.url.trim().is_empty() {
            return Err(OpenSearchError::InvalidInput("OpenSearch URL is required".to_string()));
        }
        if self.index_name.trim().is_empty() {
            return Err(OpenSearchError::InvalidInput("Index name is required".to_string()));
        }
        if self.top_k == 0 {
            return Err(OpenSearchError::InvalidInput("Top K must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Values a flow passes in for one search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchValues {
    /// Text to search for
    pub question: String,
    /// Exact-match conditions on metadata keys
    pub filter: Metadata,
}

impl SearchValues {
    /// Search for `question` with no filter
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            filter: Metadata::new(),
        }
    }

    /// Parse the values input
    ///
    /// Accepts an object or a string holding one. `question` is required;
    /// `filter` may be an object or a string holding one.
    pub fn parse(raw: &Value) -> Result<Self, OpenSearchError> {
        let values = match raw {
            Value::String(s) => serde_json::from_str::<Value>(s)
                .map_err(|e| OpenSearchError::InvalidInput(format!("values is not valid JSON: {}", e)))?,
            other => other.clone(),
        };
        let Value::Object(values) = values else {
            return Err(OpenSearchError::InvalidInput("values must be a JSON object".to_string()));
        };

        let question = values
            .get("question")
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| OpenSearchError::InvalidInput("values.question is required".to_string()))?
            .to_string();

        let filter = match values.get("filter") {
            None | Some(Value::Null) => Metadata::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(Value::String(s)) if s.trim().is_empty() => Metadata::new(),
            Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => map,
                _ => {
                    return Err(OpenSearchError::InvalidInput(
                        "values.filter must be a JSON object".to_string(),
                    ))
                }
            },
            Some(_) => {
                return Err(OpenSearchError::InvalidInput(
                    "values.filter must be a JSON object".to_string(),
                ))
            }
        };

        Ok(Self { question, filter })
    }
}
