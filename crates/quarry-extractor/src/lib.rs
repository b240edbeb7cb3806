//! Quarry Extractor
//!
//! Turns structured content entries into plain-text documents.
//!
//! # Overview
//!
//! An entry is a JSON object with `sys` (identity, content type) and `fields`
//! (arbitrary nested values, including rich-text trees and references to
//! other entries and assets). A [`LoaderConfig`] names the fields to render
//! for the main content type and for each embedded content type.
//!
//! # Architecture
//!
//! ```text
//! Entry → DocumentAssembler → Projector ─┬→ scalar / array / reference rendering
//!                                        └→ flatten (rich text) ──→ Projector (embedded entries)
//! ```
//!
//! Recoverable problems (a missing field, a malformed node, an asset without a
//! file) are logged and contribute empty text; they never abort an entry.
//!
//! # Example Usage
//!
//! ```
//! use quarry_extractor::{DocumentAssembler, LoaderConfig, SourceContext};
//! use serde_json::json;
//!
//! let config = LoaderConfig::from_json(r#"{
//!     "mainContentType": { "contentType": "faq", "fieldsToParse": ["fields.question", "fields.answer"] }
//! }"#).unwrap();
//! let context = SourceContext::new("space", "master");
//! let assembler = DocumentAssembler::new(&config, &context, true);
//!
//! let entry = json!({
//!     "sys": { "id": "faq1", "contentType": { "sys": { "id": "faq" } } },
//!     "fields": { "question": "Why?", "answer": "Because." }
//! });
//! let doc = assembler.build(&entry);
//!
//! assert_eq!(doc.text, "question: Why?\n\nanswer: Because.\n\n");
//! assert_eq!(doc.metadata_str("source"), Some("https://www.example.com/faq1"));
//! ```

#![warn(missing_docs)]

mod assembler;
mod chunking;
mod config;
mod error;
mod flattener;
pub mod path;
pub mod projector;
mod types;
pub mod value;

#[cfg(test)]
mod tests;

pub use assembler::DocumentAssembler;
pub use chunking::TextChunker;
pub use config::{
    ChunkStrategy, ChunkerConfig, CitationConfig, ContentTypeConfig, LoaderConfig,
    RichTextParsingRules, EMBEDDED_ASSET_BLOCK, EMBEDDED_ENTRY_BLOCK, EMBEDDED_ENTRY_INLINE,
};
pub use error::{ExtractorError, Skip, SkipReason};
pub use flattener::{flatten, FlattenRules, ProjectFn};
pub use path::resolve_path;
pub use projector::Projector;
pub use types::{EntryMetadata, SourceContext, DOCTYPE};
pub use value::{FieldValue, NodeKind};
