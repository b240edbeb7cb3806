//! Output formatting for the CLI.

use crate::config::{OutputFormat, Profile};
use crate::error::Result;
use colored::*;
use quarry_domain::{Document, NodeOutput};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Characters of document text shown in a table cell
const PREVIEW_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of a node run.
    pub fn format_output(&self, output: &NodeOutput) -> Result<String> {
        match output {
            NodeOutput::Documents(documents) => self.format_documents(documents),
            NodeOutput::Text(texts) => match self.format {
                OutputFormat::Json => Ok(serde_json::to_string_pretty(texts)?),
                OutputFormat::Table | OutputFormat::Quiet => Ok(texts.join("\n")),
            },
        }
    }

    /// Format a document list.
    pub fn format_documents(&self, documents: &[Document]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(documents)?),
            OutputFormat::Table => Ok(self.format_documents_table(documents)),
            OutputFormat::Quiet => Ok(documents
                .iter()
                .map(|d| d.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_documents_table(&self, documents: &[Document]) -> String {
        if documents.is_empty() {
            return self.colorize("No documents found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Title", "Source", "Text"]);

        for (i, doc) in documents.iter().enumerate() {
            builder.push_record([
                (i + 1).to_string(),
                metadata_cell(doc, "title"),
                metadata_cell(doc, "source"),
                preview(&doc.text),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the profile list, marking the active one.
    pub fn format_profiles<'a, I>(&self, profiles: I, active: &str) -> String
    where
        I: IntoIterator<Item = (&'a String, &'a Profile)>,
    {
        let mut builder = Builder::default();
        builder.push_record(["", "Profile", "Space", "Index", "Embedder"]);

        let mut empty = true;
        for (name, profile) in profiles {
            empty = false;
            let marker = if name == active { "*" } else { "" };
            let name = if name == active {
                self.colorize(name, "green")
            } else {
                name.clone()
            };
            builder.push_record([
                marker.to_string(),
                name,
                profile.contentful.space_id.clone().unwrap_or_default(),
                profile.opensearch.index.clone().unwrap_or_default(),
                format!("{:?}", profile.embedding.provider).to_lowercase(),
            ]);
        }

        if empty {
            return self.info("No profiles configured");
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }

    /// Format one profile; tokens and passwords are masked.
    pub fn format_profile(&self, name: &str, profile: &Profile) -> String {
        let mut lines = vec![format!("Active profile: {}", self.colorize(name, "green"))];
        let c = &profile.contentful;
        lines.push("  Contentful:".to_string());
        lines.push(format!("    Space: {}", c.space_id.as_deref().unwrap_or("-")));
        lines.push(format!("    Environment: {}", c.environment.as_deref().unwrap_or("-")));
        lines.push(format!("    Delivery token: {}", mask(c.delivery_token.as_deref())));
        lines.push(format!("    Preview token: {}", mask(c.preview_token.as_deref())));
        let o = &profile.opensearch;
        lines.push("  OpenSearch:".to_string());
        lines.push(format!("    URL: {}", o.url.as_deref().unwrap_or("-")));
        lines.push(format!("    Index: {}", o.index.as_deref().unwrap_or("-")));
        lines.push(format!("    Username: {}", o.username.as_deref().unwrap_or("-")));
        lines.push(format!("    Password: {}", mask(o.password.as_deref())));
        let e = &profile.embedding;
        lines.push("  Embedding:".to_string());
        lines.push(format!("    Provider: {:?}", e.provider));
        lines.push(format!("    Endpoint: {}", e.endpoint));
        lines.push(format!("    Model: {}", e.model));
        lines.push(format!("    Dimension: {}", e.dimension));
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn metadata_cell(doc: &Document, key: &str) -> String {
    doc.metadata_str(key).unwrap_or("-").to_string()
}

/// First characters of `text` on one line
fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{}…", cut)
}

fn mask(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "********",
        _ => "-",
    }
}
