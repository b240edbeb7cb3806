//! Document module - the unit every loader and retriever produces

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form document metadata
pub type Metadata = Map<String, Value>;

/// A piece of text with the metadata describing where it came from
///
/// Documents are created once by a loader or retriever and are not
/// modified afterwards; metadata merges and splits produce new documents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Rendered text content
    #[serde(rename = "pageContent")]
    pub text: String,

    /// Metadata object (source, title, identifiers, ...)
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a new document
    ///
    /// # Examples
    ///
    /// ```
    /// use quarry_domain::{Document, Metadata};
    ///
    /// let doc = Document::new("Hello", Metadata::new());
    /// assert_eq!(doc.text, "Hello");
    /// ```
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Return a copy whose metadata has `extra` merged over the existing keys
    ///
    /// Keys present in both objects take the value from `extra`.
    pub fn with_merged_metadata(&self, extra: &Metadata) -> Self {
        let mut metadata = self.metadata.clone();
        for (key, value) in extra {
            metadata.insert(key.clone(), value.clone());
        }
        Self {
            text: self.text.clone(),
            metadata,
        }
    }

    /// Look up a metadata value as a string
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}
