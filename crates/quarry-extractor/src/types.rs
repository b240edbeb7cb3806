//! Document metadata types

use quarry_domain::Metadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `doctype` value carried by every loaded document
pub const DOCTYPE: &str = "contentfulEntry";

/// Space and environment the entries were read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContext {
    /// Space identifier
    pub space_id: String,

    /// Environment identifier
    pub environment_id: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(space_id: impl Into<String>, environment_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            environment_id: environment_id.into(),
        }
    }

    /// Web-app URL for editing one entry
    pub fn management_url(&self, entry_id: &str) -> String {
        format!(
            "https://app.contentful.com/spaces/{}/environments/{}/entries/{}",
            self.space_id, self.environment_id, entry_id
        )
    }
}

/// Metadata attached to a document built from one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    /// Main content type the entry was queried as
    pub content_type: String,

    /// Canonical public URL (`urlPrefix + slug`)
    pub source: String,

    /// `sys.id` of the entry
    pub entry_id: String,

    /// Always [`DOCTYPE`]
    pub doctype: String,

    /// Title field value, or the entry id
    pub title: Value,

    /// Management URL of the entry
    pub contentful_url: String,
}

impl From<EntryMetadata> for Metadata {
    fn from(meta: EntryMetadata) -> Self {
        let mut map = Metadata::new();
        map.insert("contentType".to_string(), Value::String(meta.content_type));
        map.insert("source".to_string(), Value::String(meta.source));
        map.insert("entryId".to_string(), Value::String(meta.entry_id));
        map.insert("doctype".to_string(), Value::String(meta.doctype));
        map.insert("title".to_string(), meta.title);
        map.insert("contentfulUrl".to_string(), Value::String(meta.contentful_url));
        map
    }
}
