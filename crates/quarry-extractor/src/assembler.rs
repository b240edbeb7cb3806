//! Entry-to-document assembly

use crate::config::{CitationConfig, ContentTypeConfig, LoaderConfig};
use crate::path::resolve_path;
use crate::projector::Projector;
use crate::types::{EntryMetadata, SourceContext, DOCTYPE};
use crate::value::entry_id;
use quarry_domain::Document;
use serde_json::Value;
use tracing::warn;

/// Builds one [`Document`] per entry
///
/// Pure: no I/O, entries are only read.
#[derive(Debug, Clone, Copy)]
pub struct DocumentAssembler<'a> {
    projector: Projector<'a>,
    main: &'a ContentTypeConfig,
    citation: &'a CitationConfig,
    context: &'a SourceContext,
}

impl<'a> DocumentAssembler<'a> {
    /// Create an assembler for the main content type of `config`
    pub fn new(config: &'a LoaderConfig, context: &'a SourceContext, include_field_names: bool) -> Self {
        Self {
            projector: Projector::new(config).with_field_names(include_field_names),
            main: &config.main_content_type,
            citation: &config.fields_for_citation,
            context,
        }
    }

    /// Build the document for one entry
    pub fn build(&self, entry: &Value) -> Document {
        let id = entry_id(entry).unwrap_or_default();

        let text = self.projector.project(entry, self.main).unwrap_or_else(|skip| {
            warn!(entry_id = id, "Entry rendered without text: {}", skip);
            String::new()
        });

        let title = resolve_path(entry, &self.citation.title_field)
            .filter(|v| is_truthy(v))
            .cloned()
            .unwrap_or_else(|| Value::String(id.to_string()));

        let slug = resolve_path(entry, &self.citation.slug_field)
            .filter(|v| is_truthy(v))
            .map(display)
            .unwrap_or_else(|| id.to_string());

        let metadata = EntryMetadata {
            content_type: self.main.content_type.clone(),
            source: format!("{}{}", self.citation.url_prefix, slug),
            entry_id: id.to_string(),
            doctype: DOCTYPE.to_string(),
            title,
            contentful_url: self.context.management_url(id),
        };

        Document::new(text, metadata.into())
    }

    /// Build documents for every entry, preserving order
    pub fn build_all(&self, entries: &[Value]) -> Vec<Document> {
        entries.iter().map(|entry| self.build(entry)).collect()
    }
}

/// Truthiness used for citation fallbacks: null, false, 0 and "" are empty
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings without JSON quoting, everything else as JSON
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
