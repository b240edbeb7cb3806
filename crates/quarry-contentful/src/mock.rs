//! In-memory entry source for tests
//!
//! Serves a fixed list of entries in pages and records every request.

use crate::client::{EntryPage, EntryQuery, EntrySource, Includes};
use crate::error::ContentfulError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

/// Entry source backed by a vector
///
/// Clones share the request log.
#[derive(Debug, Clone)]
pub struct MockEntrySource {
    entries: Vec<Value>,
    includes: Includes,
    page_size: usize,
    fail_on_call: Option<usize>,
    requests: Arc<Mutex<Vec<EntryQuery>>>,
}

impl MockEntrySource {
    /// Serve `entries`, `page_size` per page
    pub fn new(entries: Vec<Value>, page_size: usize) -> Self {
        Self {
            entries,
            includes: Includes::default(),
            page_size: page_size.max(1),
            fail_on_call: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Attach linked records to every page
    pub fn with_includes(mut self, includes: Includes) -> Self {
        self.includes = includes;
        self
    }

    /// Fail the `call`-th request (1-based) with a server error
    pub fn fail_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Every query received so far
    pub fn requests(&self) -> Vec<EntryQuery> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Offsets of every query received so far
    pub fn offsets(&self) -> Vec<usize> {
        self.requests().iter().map(EntryQuery::skip).collect()
    }
}

#[async_trait]
impl EntrySource for MockEntrySource {
    async fn get_entries(&self, query: &EntryQuery) -> Result<EntryPage, ContentfulError> {
        let call = {
            let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
            requests.push(query.clone());
            requests.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(ContentfulError::Api {
                status: 500,
                message: "mock failure".to_string(),
            });
        }

        let skip = query.skip().min(self.entries.len());
        let end = (skip + self.page_size).min(self.entries.len());

        Ok(EntryPage {
            items: self.entries[skip..end].to_vec(),
            skip,
            limit: self.page_size,
            total: self.entries.len(),
            includes: self.includes.clone(),
        })
    }
}
