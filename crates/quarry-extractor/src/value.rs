//! Classification of raw entry values and rich-text nodes
//!
//! Raw JSON is inspected once here and turned into a closed set of variants;
//! the projector and flattener only match on these variants.

use crate::error::{Skip, SkipReason};
use serde_json::{Map, Value};

/// Rich-text node types that are blocks
const BLOCK_TYPES: &[&str] = &[
    "document",
    "paragraph",
    "heading-1",
    "heading-2",
    "heading-3",
    "heading-4",
    "heading-5",
    "heading-6",
    "ordered-list",
    "unordered-list",
    "list-item",
    "hr",
    "blockquote",
    "embedded-entry-block",
    "embedded-asset-block",
    "embedded-resource-block",
    "table",
    "table-row",
    "table-cell",
    "table-header-cell",
];

/// Rich-text node types that are inlines
const INLINE_TYPES: &[&str] = &[
    "asset-hyperlink",
    "embedded-entry-inline",
    "embedded-resource-inline",
    "entry-hyperlink",
    "hyperlink",
    "resource-hyperlink",
];

/// A reference to an asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetRef<'a> {
    /// Asset title, if present and non-empty
    pub title: Option<&'a str>,
    /// Protocol-relative file URL (`//images.ctfassets.net/...`)
    pub url: Option<&'a str>,
}

impl<'a> AssetRef<'a> {
    /// Read title and URL from an asset object
    fn from_value(value: &'a Value) -> Self {
        let fields = value.get("fields");
        Self {
            title: fields
                .and_then(|f| f.get("title"))
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty()),
            url: fields
                .and_then(|f| f.get("file"))
                .and_then(|f| f.get("url"))
                .and_then(Value::as_str),
        }
    }

    /// Render as `![title](https:url)`
    pub fn marker(&self) -> Result<String, Skip> {
        let url = self.url.ok_or_else(|| {
            Skip::new(
                SkipReason::AssetWithoutFile,
                format!("asset '{}'", self.title.unwrap_or("Asset")),
            )
        })?;
        Ok(format!("![{}](https:{})", self.title.unwrap_or("Asset"), url))
    }
}

/// A reference to an entry that carries a content type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryRef<'a> {
    /// `sys.contentType.sys.id`
    pub content_type: &'a str,
    /// The whole entry object
    pub value: &'a Value,
}

/// Classification of a resolved field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Asset reference (`sys.type == "Asset"`)
    Asset(AssetRef<'a>),
    /// Rich-text document (`nodeType == "document"`)
    RichText(&'a Value),
    /// Plain string
    Text(&'a str),
    /// Array of values
    Array(&'a [Value]),
    /// Entry carrying a content type id
    Entry(EntryRef<'a>),
    /// Any other object
    Object(&'a Map<String, Value>),
    /// Number or boolean
    Scalar(&'a Value),
    /// JSON null
    Null,
}

impl<'a> FieldValue<'a> {
    /// Classify a raw JSON value
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(_) | Value::Number(_) => FieldValue::Scalar(value),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::Array(items),
            Value::Object(map) => {
                if sys_type(value) == Some("Asset") {
                    FieldValue::Asset(AssetRef::from_value(value))
                } else if map.get("nodeType").and_then(Value::as_str) == Some("document") {
                    FieldValue::RichText(value)
                } else if let Some(content_type) = content_type_id(value) {
                    FieldValue::Entry(EntryRef { content_type, value })
                } else {
                    FieldValue::Object(map)
                }
            }
        }
    }
}

/// Render a value without any content-type configuration
///
/// Assets become markers, entries become `Referenced Entry: <id>`, other
/// objects and arrays are serialized as JSON, scalars are stringified.
pub fn render_simple(value: &Value) -> Result<String, Skip> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Object(_) => match sys_type(value) {
            Some("Asset") => AssetRef::from_value(value).marker(),
            Some("Entry") => Ok(format!(
                "Referenced Entry: {}",
                entry_id(value).unwrap_or_default()
            )),
            _ => Ok(value.to_string()),
        },
        other => Ok(render_scalar(other)),
    }
}

/// Stringify a scalar the way a script runtime would
///
/// Whole floats lose their fractional part (`1.0` renders as `1`).
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.is_finite() => format!("{}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Classification of a rich-text node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind<'a> {
    /// Text leaf with its literal value
    Text(&'a str),
    /// `embedded-asset-block`
    EmbeddedAsset,
    /// `embedded-entry-block` or `embedded-entry-inline`
    EmbeddedEntry,
    /// Any other block node
    Block,
    /// Any other inline node
    Inline,
    /// Unrecognized node type
    Unknown,
}

impl<'a> NodeKind<'a> {
    /// Classify a rich-text node
    pub fn classify(node: &'a Value) -> Self {
        match node_type(node) {
            "text" => NodeKind::Text(node.get("value").and_then(Value::as_str).unwrap_or_default()),
            "embedded-asset-block" => NodeKind::EmbeddedAsset,
            "embedded-entry-block" | "embedded-entry-inline" => NodeKind::EmbeddedEntry,
            t if BLOCK_TYPES.contains(&t) => NodeKind::Block,
            t if INLINE_TYPES.contains(&t) => NodeKind::Inline,
            _ => NodeKind::Unknown,
        }
    }
}

/// `nodeType` of a rich-text node, empty when absent
pub fn node_type(node: &Value) -> &str {
    node.get("nodeType").and_then(Value::as_str).unwrap_or_default()
}

/// Whether a rich-text node is a block node
pub fn is_block(node: &Value) -> bool {
    BLOCK_TYPES.contains(&node_type(node))
}

/// Classify the target of an embedded asset node
pub fn asset_target(node: &Value) -> Result<AssetRef<'_>, Skip> {
    let target = embedded_target(node)?;
    Ok(AssetRef::from_value(target))
}

/// `data.target` of an embedded node
pub fn embedded_target(node: &Value) -> Result<&Value, Skip> {
    node.get("data")
        .and_then(|d| d.get("target"))
        .filter(|t| !t.is_null())
        .ok_or_else(|| Skip::new(SkipReason::MissingTarget, node_type(node).to_string()))
}

/// `sys.type` of an object
pub fn sys_type(value: &Value) -> Option<&str> {
    value.get("sys")?.get("type")?.as_str()
}

/// `sys.id` of an object
pub fn entry_id(value: &Value) -> Option<&str> {
    value.get("sys")?.get("id")?.as_str()
}

/// `sys.contentType.sys.id` of an entry
pub fn content_type_id(value: &Value) -> Option<&str> {
    value
        .get("sys")?
        .get("contentType")?
        .get("sys")?
        .get("id")?
        .as_str()
        .filter(|id| !id.is_empty())
}
