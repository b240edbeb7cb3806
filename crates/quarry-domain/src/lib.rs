//! Quarry Domain Layer
//!
//! This crate contains the shared model that every other Quarry crate builds on.
//! It defines the document envelope produced by loaders and retrievers, the
//! node descriptor that a flow host uses to register a node, and the trait
//! interfaces for the collaborators that sit outside the core algorithms.
//!
//! ## Key Concepts
//!
//! - **Document**: text plus a free-form JSON metadata object
//! - **Node descriptor**: label, inputs, outputs and credential requirement of a node
//! - **Node output**: either a list of documents or a list of strings
//! - **Collaborators**: embeddings, text splitting and retrieval behind traits
//!
//! ## Architecture
//!
//! - No network or storage code lives here
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod node;
pub mod traits;

// Re-exports for convenience
pub use document::{Document, Metadata};
pub use node::{CredentialSpec, InputParam, NodeDescriptor, NodeOutput, OutputKind, OutputSpec, ParamKind};
pub use traits::{DocumentLoader, Embeddings, Retriever, TextSplitter};
