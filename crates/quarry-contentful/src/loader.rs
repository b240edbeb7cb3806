//! The Contentful document loader node.

use crate::client::{ApiType, ContentfulClient, EntryQuery, EntrySource};
use crate::error::ContentfulError;
use crate::pagination::fetch_all_entries;
use async_trait::async_trait;
use quarry_domain::{
    CredentialSpec, Document, DocumentLoader, InputParam, Metadata, NodeDescriptor, NodeOutput,
    OutputKind, ParamKind, TextSplitter,
};
use quarry_extractor::{DocumentAssembler, LoaderConfig, SourceContext};
use serde_json::Value;
use tracing::warn;

/// Environment used when none is given
pub const DEFAULT_ENVIRONMENT: &str = "master";

/// Space id and API tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentfulCredentials {
    /// Space identifier
    pub space_id: String,
    /// Content Delivery API token
    pub delivery_token: String,
    /// Content Preview API token
    pub preview_token: Option<String>,
}

impl ContentfulCredentials {
    /// Credentials for the delivery API
    pub fn new(space_id: impl Into<String>, delivery_token: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            delivery_token: delivery_token.into(),
            preview_token: None,
        }
    }

    /// Add a preview token
    pub fn with_preview_token(mut self, token: impl Into<String>) -> Self {
        self.preview_token = Some(token.into());
        self
    }

    /// Token matching `api`
    pub fn access_token(&self, api: ApiType) -> Result<&str, ContentfulError> {
        match api {
            ApiType::Delivery => Ok(&self.delivery_token),
            ApiType::Preview => self
                .preview_token
                .as_deref()
                .ok_or_else(|| ContentfulError::Config("Preview API requires a preview token".to_string())),
        }
    }
}

/// Inputs of one load
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderOptions {
    /// Environment identifier
    pub environment_id: String,
    /// Delivery or preview API
    pub api_type: ApiType,
    /// Link include depth
    pub include: Option<u32>,
    /// Fetch every page instead of one
    pub include_all: bool,
    /// Page size, sent only when `include_all` is off
    pub limit: Option<u32>,
    /// Query parameters, also merged into every document's metadata
    pub metadata: Metadata,
    /// Projection configuration
    pub config: LoaderConfig,
    /// Prefix rendered fields with their names
    pub include_field_names: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            environment_id: DEFAULT_ENVIRONMENT.to_string(),
            api_type: ApiType::Delivery,
            include: None,
            include_all: false,
            limit: None,
            metadata: Metadata::new(),
            config: LoaderConfig::default(),
            include_field_names: false,
        }
    }
}

impl LoaderOptions {
    /// Use a JSON configuration string; malformed input yields the default configuration
    pub fn with_config_json(mut self, raw: &str) -> Self {
        self.config = LoaderConfig::parse_or_default(raw);
        self
    }

    /// Use a metadata object or JSON-encoded object; anything else yields `{}`
    pub fn with_metadata(mut self, raw: &Value) -> Self {
        self.metadata = parse_metadata(raw);
        self
    }

    /// Query for the first page
    ///
    /// The metadata object is the base; `limit`, `include` and
    /// `content_type` are layered on top.
    pub fn query(&self) -> EntryQuery {
        let mut query = EntryQuery::new(self.metadata.clone());
        if let Some(limit) = self.limit.filter(|l| *l > 0 && !self.include_all) {
            query.set("limit", limit);
        }
        if let Some(include) = self.include.filter(|i| *i > 0) {
            query.set("include", include);
        }
        let content_type = &self.config.main_content_type.content_type;
        if !content_type.is_empty() {
            query.set("content_type", content_type.as_str());
        }
        query
    }
}

/// Accept an object, or a string holding a JSON object
pub fn parse_metadata(raw: &Value) -> Metadata {
    match raw {
        Value::Null => Metadata::new(),
        Value::Object(map) => map.clone(),
        Value::String(s) if s.trim().is_empty() => Metadata::new(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("Metadata is not a JSON object, ignoring it");
                Metadata::new()
            }
            Err(e) => {
                warn!("Failed to parse metadata, ignoring it: {}", e);
                Metadata::new()
            }
        },
        _ => {
            warn!("Metadata is not a JSON object, ignoring it");
            Metadata::new()
        }
    }
}

/// Loads documents from one space
#[derive(Debug, Clone)]
pub struct ContentfulLoader<S = ContentfulClient> {
    source: S,
    context: SourceContext,
    options: LoaderOptions,
}

impl ContentfulLoader<ContentfulClient> {
    /// Create a loader talking to the Contentful API selected by `options`
    pub fn connect(
        credentials: &ContentfulCredentials,
        options: LoaderOptions,
    ) -> Result<Self, ContentfulError> {
        let token = credentials.access_token(options.api_type)?;
        let client = ContentfulClient::new(
            credentials.space_id.clone(),
            options.environment_id.clone(),
            token,
            options.api_type,
        )?;
        Ok(Self::new(client, credentials.space_id.clone(), options))
    }
}

impl<S: EntrySource> ContentfulLoader<S> {
    /// Create a loader over any entry source
    pub fn new(source: S, space_id: impl Into<String>, options: LoaderOptions) -> Self {
        let context = SourceContext::new(space_id, options.environment_id.clone());
        Self {
            source,
            context,
            options,
        }
    }

    /// Options of this loader
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Underlying entry source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load, optionally split, and shape the output
    pub async fn run(
        &self,
        output: OutputKind,
        splitter: Option<&(dyn TextSplitter + Sync)>,
    ) -> Result<NodeOutput, ContentfulError> {
        let documents = match splitter {
            Some(splitter) => self.load_and_split(splitter).await?,
            None => self.load().await?,
        };
        Ok(NodeOutput::from_documents(documents, output))
    }
}

#[async_trait]
impl<S: EntrySource> DocumentLoader for ContentfulLoader<S> {
    type Error = ContentfulError;

    async fn load(&self) -> Result<Vec<Document>, Self::Error> {
        let entries = fetch_all_entries(&self.source, &self.options.query(), self.options.include_all).await?;

        let assembler = DocumentAssembler::new(
            &self.options.config,
            &self.context,
            self.options.include_field_names,
        );
        let documents = assembler.build_all(&entries);

        if self.options.metadata.is_empty() {
            return Ok(documents);
        }
        Ok(documents
            .iter()
            .map(|doc| doc.with_merged_metadata(&self.options.metadata))
            .collect())
    }
}

/// Registration data for the loader node
pub fn descriptor() -> NodeDescriptor {
    let mut node = NodeDescriptor::new(
        "contentful",
        "Contentful",
        "Document Loaders",
        "Load data from a Contentful Space",
        1.1,
    );

    node.set_credential(CredentialSpec {
        label: "Connect Credential".to_string(),
        credential_names: vec!["contentfulDeliveryApi".to_string()],
        params: vec![
            "spaceId".to_string(),
            "deliveryToken".to_string(),
            "previewToken".to_string(),
        ],
    });

    node.add_input(InputParam::new("Text Splitter", "textSplitter", ParamKind::Connection).optional());
    node.add_input(
        InputParam::new("API Type", "apiType", ParamKind::Options)
            .with_options(["delivery", "preview"])
            .with_default(ApiType::Delivery.to_string()),
    );

    let mut config = InputParam::new("Config Utility", "configUtility", ParamKind::Json);
    if let Ok(default) = LoaderConfig::default().to_json() {
        config = config.with_default(default);
    }
    node.add_input(config);

    node.add_input(
        InputParam::new("Include Field Names", "includeFieldNames", ParamKind::Boolean)
            .with_default(false)
            .optional()
            .with_description("Include field names in the output"),
    );
    node.add_input(
        InputParam::new("Environment Id", "environmentId", ParamKind::String)
            .with_default(DEFAULT_ENVIRONMENT)
            .additional(),
    );
    node.add_input(
        InputParam::new("Include Levels", "include", ParamKind::Number)
            .with_default(1)
            .optional()
            .additional()
            .with_description("The number of levels to include in the response"),
    );
    node.add_input(
        InputParam::new("Include All", "includeAll", ParamKind::Boolean)
            .optional()
            .additional()
            .with_description("Include all entries in the response"),
    );
    node.add_input(
        InputParam::new("Limit", "limit", ParamKind::Number)
            .optional()
            .additional()
            .with_description("The limit of items to return, default is 50"),
    );
    node.add_input(InputParam::new("Search Query", "metadata", ParamKind::Json).optional().additional());

    node.add_output("document", "Documents", OutputKind::Documents);
    node.add_output("stringOutput", "String", OutputKind::Text);
    node
}
