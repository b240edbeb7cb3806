//! Content-type field projection
//!
//! Renders the configured fields of an entry as text, one block per field,
//! recursing into embedded entries whose content type has a configuration.

use crate::config::{find_config, ContentTypeConfig, LoaderConfig, RichTextParsingRules};
use crate::error::{Skip, SkipReason};
use crate::flattener::{flatten, FlattenRules};
use crate::path::{field_name, resolve_path};
use crate::value::{entry_id, render_scalar, render_simple, FieldValue};
use serde_json::Value;
use tracing::{debug, warn};

/// Block divisor used when flattening rich-text fields
pub const RICH_TEXT_DIVISOR: &str = "\n";

/// Remove every double-quote character
///
/// ```
/// use quarry_extractor::projector::strip_quotes;
///
/// assert_eq!(strip_quotes(r#"say "hi""#), "say hi");
/// ```
pub fn strip_quotes(text: &str) -> String {
    text.replace('"', "")
}

/// Renders entries according to content-type configurations
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    embedded: &'a [ContentTypeConfig],
    rules: &'a RichTextParsingRules,
    include_field_names: bool,
}

impl<'a> Projector<'a> {
    /// Create a projector using the embedded types and rules of `config`
    pub fn new(config: &'a LoaderConfig) -> Self {
        Self {
            embedded: &config.embedded_content_types,
            rules: &config.rich_text_parsing_rules,
            include_field_names: false,
        }
    }

    /// Prefix every field with `<name>: `
    pub fn with_field_names(mut self, include: bool) -> Self {
        self.include_field_names = include;
        self
    }

    /// Render the fields of `entry` declared by `config`, in declared order
    ///
    /// Paths are resolved against the whole entry, so `sys.*` paths work
    /// even when the entry has no `fields`. Missing fields are left out. A
    /// field whose value cannot be rendered still appears, with empty text.
    pub fn project(&self, entry: &Value, config: &ContentTypeConfig) -> Result<String, Skip> {
        let id = entry_id(entry).unwrap_or_default();
        if entry.get("sys").is_none() {
            return Err(Skip::new(SkipReason::MissingSys, config.content_type.clone()));
        }

        let mut text = String::new();
        for path in &config.fields_to_parse {
            let Some(value) = resolve_path(entry, path).filter(|v| !v.is_null()) else {
                warn!(entry_id = id, field = %path, "Field value is undefined");
                continue;
            };

            let rendered = self.render_value(value).unwrap_or_else(|skip| {
                warn!(entry_id = id, field = %path, "Could not render field: {}", skip);
                String::new()
            });

            if self.include_field_names {
                text.push_str(field_name(path));
                text.push_str(": ");
            }
            text.push_str(&rendered);
            text.push_str("\n\n");
        }

        debug!(entry_id = id, content_type = %config.content_type, chars = text.len(), "Projected entry");
        Ok(text)
    }

    fn render_value(&self, value: &Value) -> Result<String, Skip> {
        match FieldValue::classify(value) {
            FieldValue::Asset(asset) => asset.marker(),
            FieldValue::RichText(document) => {
                let rules = FlattenRules {
                    parsing: self.rules,
                    embedded: self.embedded,
                };
                let project = |entry: &Value, config: &ContentTypeConfig| self.project(entry, config);
                flatten(document, RICH_TEXT_DIVISOR, &rules, &project).map(|t| strip_quotes(&t))
            }
            FieldValue::Text(s) => Ok(strip_quotes(s)),
            FieldValue::Array(items) => Ok(items
                .iter()
                .filter_map(|item| match self.render_element(item) {
                    Ok(rendered) if !rendered.is_empty() => Some(rendered),
                    Ok(_) => None,
                    Err(skip) => {
                        warn!("Could not render array element: {}", skip);
                        None
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")),
            FieldValue::Entry(entry) => match find_config(self.embedded, entry.content_type) {
                Some(config) => self.project(entry.value, config),
                None => render_simple(value),
            },
            FieldValue::Object(_) => render_simple(value),
            FieldValue::Scalar(v) => Ok(render_scalar(v)),
            FieldValue::Null => Ok(String::new()),
        }
    }

    fn render_element(&self, item: &Value) -> Result<String, Skip> {
        if let FieldValue::Entry(entry) = FieldValue::classify(item) {
            if let Some(config) = find_config(self.embedded, entry.content_type) {
                return self.project(item, config);
            }
        }
        render_simple(item)
    }
}
