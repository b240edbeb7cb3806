//! Quarry Contentful loader
//!
//! Reads entries from the Contentful Delivery or Preview API and turns them
//! into documents using `quarry-extractor`.
//!
//! # Example
//!
//! ```no_run
//! use quarry_contentful::{ContentfulCredentials, ContentfulLoader, LoaderOptions};
//! use quarry_domain::DocumentLoader;
//!
//! # async fn example() -> Result<(), quarry_contentful::ContentfulError> {
//! let credentials = ContentfulCredentials::new("my-space", "delivery-token");
//! let options = LoaderOptions {
//!     include_all: true,
//!     ..LoaderOptions::default()
//! }
//! .with_config_json(r#"{"mainContentType": {"contentType": "blogPost", "fieldsToParse": ["fields.title", "fields.body"]}}"#);
//!
//! let loader = ContentfulLoader::connect(&credentials, options)?;
//! let documents = loader.load().await?;
//! println!("Loaded {} documents", documents.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod links;
mod loader;
mod mock;
mod pagination;

pub use client::{ApiType, ContentfulClient, EntryPage, EntryQuery, EntrySource, Includes};
pub use error::ContentfulError;
pub use links::LinkResolver;
pub use loader::{
    descriptor, parse_metadata, ContentfulCredentials, ContentfulLoader, LoaderOptions,
    DEFAULT_ENVIRONMENT,
};
pub use mock::MockEntrySource;
pub use pagination::fetch_all_entries;
