//! Node descriptors - how a loader or retriever presents itself to a flow host
//!
//! A host registers a node by reading its [`NodeDescriptor`]: the credential it
//! needs, the typed inputs it accepts and the outputs it can produce. Running
//! the node yields a [`NodeOutput`] shaped by the selected [`OutputKind`].

use crate::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of a node input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKind {
    /// Free text
    String,
    /// Number
    Number,
    /// Toggle
    Boolean,
    /// JSON object or JSON-encoded string
    Json,
    /// One of a fixed set of options
    Options,
    /// Connection to another node (embeddings, text splitter, ...)
    Connection,
}

/// A typed node input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputParam {
    /// Human label
    pub label: String,

    /// Machine name used as the input key
    pub name: String,

    /// Input type
    #[serde(rename = "type")]
    pub kind: ParamKind,

    /// Default value, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Allowed values for [`ParamKind::Options`]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Whether the input may be left empty
    #[serde(default)]
    pub optional: bool,

    /// Shown under "additional parameters" in an editor
    #[serde(default)]
    pub additional: bool,

    /// Longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InputParam {
    /// Create a required input with no default
    pub fn new(label: impl Into<String>, name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            kind,
            default: None,
            options: Vec::new(),
            optional: false,
            additional: false,
            description: None,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the allowed options
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the input optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the input as an additional parameter
    pub fn additional(mut self) -> Self {
        self.additional = true;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Credential requirement of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSpec {
    /// Human label
    pub label: String,

    /// Accepted credential names
    pub credential_names: Vec<String>,

    /// Parameters read from the credential (e.g. `spaceId`, `deliveryToken`)
    pub params: Vec<String>,
}

/// What a node can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputKind {
    /// A list of documents
    Documents,
    /// Plain text (one string per document, or one concatenated string)
    Text,
}

/// A declared node output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    /// Human label
    pub label: String,

    /// Output selector name
    pub name: String,

    /// Output kind
    pub kind: OutputKind,
}

/// Everything a flow host needs to register a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Human label
    pub label: String,

    /// Unique machine name
    pub name: String,

    /// Node version
    pub version: f32,

    /// Category shown in the node palette
    pub category: String,

    /// One-line description
    pub description: String,

    /// Credential requirement, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialSpec>,

    /// Declared inputs
    pub inputs: Vec<InputParam>,

    /// Declared outputs
    pub outputs: Vec<OutputSpec>,
}

impl NodeDescriptor {
    /// Create a descriptor without inputs or outputs
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        version: f32,
    ) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            version,
            category: category.into(),
            description: description.into(),
            credential: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Declare the credential requirement
    pub fn set_credential(&mut self, credential: CredentialSpec) {
        self.credential = Some(credential);
    }

    /// Declare an input
    pub fn add_input(&mut self, input: InputParam) {
        self.inputs.push(input);
    }

    /// Declare an output
    pub fn add_output(&mut self, name: impl Into<String>, label: impl Into<String>, kind: OutputKind) {
        self.outputs.push(OutputSpec {
            label: label.into(),
            name: name.into(),
            kind,
        });
    }

    /// Find an input by name
    pub fn input(&self, name: &str) -> Option<&InputParam> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Find the output kind registered under `name`
    pub fn output_kind(&self, name: &str) -> Option<OutputKind> {
        self.outputs.iter().find(|o| o.name == name).map(|o| o.kind)
    }
}

/// Result of running a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeOutput {
    /// Document list output
    Documents(Vec<Document>),
    /// String output
    Text(Vec<String>),
}

impl NodeOutput {
    /// Number of items in the output
    pub fn len(&self) -> usize {
        match self {
            NodeOutput::Documents(docs) => docs.len(),
            NodeOutput::Text(texts) => texts.len(),
        }
    }

    /// Whether the output holds no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the output of the requested kind from a document list
    ///
    /// Text output keeps one string per document.
    pub fn from_documents(documents: Vec<Document>, kind: OutputKind) -> Self {
        match kind {
            OutputKind::Documents => NodeOutput::Documents(documents),
            OutputKind::Text => NodeOutput::Text(documents.into_iter().map(|d| d.text).collect()),
        }
    }
}
