//! Configuration for entry projection and chunking
//!
//! [`LoaderConfig`] is the JSON object a user supplies to describe which
//! content types to render, how to treat embedded rich-text nodes and how to
//! derive citations. A malformed object never fails a load: callers use
//! [`LoaderConfig::parse_or_default`] and get [`LoaderConfig::default`] back.

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Rich-text node type for embedded asset blocks
pub const EMBEDDED_ASSET_BLOCK: &str = "embedded-asset-block";
/// Rich-text node type for embedded entry blocks
pub const EMBEDDED_ENTRY_BLOCK: &str = "embedded-entry-block";
/// Rich-text node type for inline embedded entries
pub const EMBEDDED_ENTRY_INLINE: &str = "embedded-entry-inline";

/// Which fields of one content type are rendered, and in which order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeConfig {
    /// Content type identifier (`sys.contentType.sys.id`)
    #[serde(default)]
    pub content_type: String,

    /// Dotted field paths, e.g. `fields.title` or `fields.items[0].name`
    #[serde(default)]
    pub fields_to_parse: Vec<String>,
}

impl ContentTypeConfig {
    /// Create a configuration for `content_type`
    pub fn new<I, S>(content_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content_type: content_type.into(),
            fields_to_parse: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Per-node-type inclusion flags for rich text
///
/// A node type that is absent or `true` is included; only an explicit
/// `false` excludes the node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichTextParsingRules(BTreeMap<String, bool>);

impl RichTextParsingRules {
    /// Whether nodes of `node_type` should be rendered
    pub fn is_enabled(&self, node_type: &str) -> bool {
        self.0.get(node_type).copied().unwrap_or(true)
    }

    /// Set the flag for `node_type`
    pub fn set(&mut self, node_type: impl Into<String>, enabled: bool) {
        self.0.insert(node_type.into(), enabled);
    }

    /// Builder form of [`RichTextParsingRules::set`]
    pub fn with(mut self, node_type: impl Into<String>, enabled: bool) -> Self {
        self.set(node_type, enabled);
        self
    }
}

impl Default for RichTextParsingRules {
    /// All embedded node types enabled
    fn default() -> Self {
        let rules = [EMBEDDED_ASSET_BLOCK, EMBEDDED_ENTRY_BLOCK, EMBEDDED_ENTRY_INLINE]
            .into_iter()
            .map(|t| (t.to_string(), true))
            .collect();
        Self(rules)
    }
}

/// How a document title and canonical URL are derived from an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationConfig {
    /// Path to the title field
    pub title_field: String,

    /// Path to the slug field
    pub slug_field: String,

    /// Prefix joined with the slug to form the source URL
    pub url_prefix: String,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            title_field: "fields.title".to_string(),
            slug_field: "fields.slug".to_string(),
            url_prefix: "https://www.example.com/".to_string(),
        }
    }
}

/// Complete projection configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderConfig {
    /// The content type being queried
    #[serde(default)]
    pub main_content_type: ContentTypeConfig,

    /// Content types that may appear nested inside main entries
    #[serde(default)]
    pub embedded_content_types: Vec<ContentTypeConfig>,

    /// Inclusion flags for rich-text nodes
    #[serde(default)]
    pub rich_text_parsing_rules: RichTextParsingRules,

    /// Citation fields
    #[serde(default)]
    pub fields_for_citation: CitationConfig,
}

impl LoaderConfig {
    /// Parse the JSON wire format
    pub fn from_json(raw: &str) -> Result<Self, ExtractorError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse the JSON wire format, falling back to the default configuration
    pub fn parse_or_default(raw: &str) -> Self {
        match Self::from_json(raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse loader config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Find the embedded configuration for `content_type`
    pub fn embedded_config(&self, content_type: &str) -> Option<&ContentTypeConfig> {
        find_config(&self.embedded_content_types, content_type)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ExtractorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Exact-match lookup of a content type configuration
pub(crate) fn find_config<'a>(
    configs: &'a [ContentTypeConfig],
    content_type: &str,
) -> Option<&'a ContentTypeConfig> {
    configs.iter().find(|c| c.content_type == content_type)
}

/// Text chunking strategy for long documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// Split by paragraphs (double newlines)
    #[default]
    ByParagraph,
    /// Split by sections (markdown headers or numbered sections)
    BySection,
    /// Split by approximate token count
    ByTokenCount,
}

/// Configuration for the text chunker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Chunking strategy
    #[serde(default)]
    pub strategy: ChunkStrategy,

    /// Maximum chunk size (characters)
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
}

fn default_max_chunk_size() -> usize {
    2_000
}

impl ChunkerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.max_chunk_size == 0 {
            return Err(ExtractorError::Config(
                "max_chunk_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkStrategy::ByParagraph,
            max_chunk_size: default_max_chunk_size(),
        }
    }
}
