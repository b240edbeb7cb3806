//! Contentful Delivery/Preview API client.

use crate::error::ContentfulError;
use async_trait::async_trait;
use quarry_domain::Metadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Request timeout for API calls (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which Contentful API to read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiType {
    /// Published content (`cdn.contentful.com`)
    #[default]
    Delivery,
    /// Draft content (`preview.contentful.com`)
    Preview,
}

impl ApiType {
    /// API host name
    pub fn host(self) -> &'static str {
        match self {
            ApiType::Delivery => "cdn.contentful.com",
            ApiType::Preview => "preview.contentful.com",
        }
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiType::Delivery => write!(f, "delivery"),
            ApiType::Preview => write!(f, "preview"),
        }
    }
}

impl FromStr for ApiType {
    type Err = ContentfulError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "delivery" => Ok(ApiType::Delivery),
            "preview" => Ok(ApiType::Preview),
            other => Err(ContentfulError::Config(format!("Unknown API type: {}", other))),
        }
    }
}

/// Query parameters for one "get entries" request
///
/// Keys are Contentful query parameter names (`content_type`, `skip`,
/// `fields.slug[in]`, ...). String values are sent verbatim; other JSON
/// values are sent as their JSON text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryQuery {
    params: Metadata,
}

impl EntryQuery {
    /// Start from a free-form parameter object
    pub fn new(base: Metadata) -> Self {
        Self { params: base }
    }

    /// Set one parameter, replacing any existing value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }

    /// Look up one parameter
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Offset of this page, `0` when unset
    pub fn skip(&self) -> usize {
        self.get("skip").and_then(Value::as_u64).unwrap_or(0) as usize
    }

    /// Copy of this query at another offset
    pub fn with_skip(&self, skip: usize) -> Self {
        let mut query = self.clone();
        query.set("skip", skip);
        query
    }

    /// Parameters as URL query pairs
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}

/// Linked records returned alongside a page
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Includes {
    /// Linked entries
    #[serde(rename = "Entry", default)]
    pub entries: Vec<Value>,

    /// Linked assets
    #[serde(rename = "Asset", default)]
    pub assets: Vec<Value>,
}

/// One page of a "get entries" response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntryPage {
    /// Entries on this page
    #[serde(default)]
    pub items: Vec<Value>,

    /// Offset of this page
    #[serde(default)]
    pub skip: usize,

    /// Page size limit applied by the server
    #[serde(default)]
    pub limit: usize,

    /// Total matching entries
    #[serde(default)]
    pub total: usize,

    /// Records referenced by links in `items`
    #[serde(default)]
    pub includes: Includes,
}

/// Anything that can answer paged entry queries
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch one page
    async fn get_entries(&self, query: &EntryQuery) -> Result<EntryPage, ContentfulError>;
}

/// HTTP client for one space and environment
#[derive(Debug, Clone)]
pub struct ContentfulClient {
    http: reqwest::Client,
    base_url: String,
    space_id: String,
    environment_id: String,
    access_token: String,
}

impl ContentfulClient {
    /// Create a client for the public API host of `api`
    pub fn new(
        space_id: impl Into<String>,
        environment_id: impl Into<String>,
        access_token: impl Into<String>,
        api: ApiType,
    ) -> Result<Self, ContentfulError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: format!("https://{}", api.host()),
            space_id: space_id.into(),
            environment_id: environment_id.into(),
            access_token: access_token.into(),
        })
    }

    /// Send requests to another base URL (proxy, local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn entries_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}/entries",
            self.base_url, self.space_id, self.environment_id
        )
    }
}

#[async_trait]
impl EntrySource for ContentfulClient {
    async fn get_entries(&self, query: &EntryQuery) -> Result<EntryPage, ContentfulError> {
        let url = self.entries_url();
        debug!(url = %url, skip = query.skip(), "Requesting entries");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&query.to_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentfulError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// `message` of a Contentful error body, or the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
