//! Paged fetching of entries

use crate::client::{EntryQuery, EntrySource};
use crate::error::ContentfulError;
use crate::links::LinkResolver;
use serde_json::Value;
use tracing::{debug, info};

/// Fetch entries starting at offset 0
///
/// With `include_all` unset exactly one page is requested. Otherwise pages
/// are requested, each at the offset advanced by the number of items already
/// received, until the reported total is reached or a page comes back empty.
/// Links in every page are resolved, as deep as the query's `include`
/// level, before the items are returned.
///
/// Any failed page fails the whole fetch; no partial result is returned.
pub async fn fetch_all_entries<S>(
    source: &S,
    query: &EntryQuery,
    include_all: bool,
) -> Result<Vec<Value>, ContentfulError>
where
    S: EntrySource + ?Sized,
{
    let mut entries = Vec::new();
    let mut skip = 0;

    loop {
        let page = source
            .get_entries(&query.with_skip(skip))
            .await
            .map_err(ContentfulError::fetch)?;

        let received = page.items.len();
        entries.extend(LinkResolver::for_query(&page, query).resolve_items(&page.items));
        skip += received;

        debug!(skip, received, total = page.total, "Fetched page");

        if !include_all || entries.len() >= page.total || received == 0 {
            info!(count = entries.len(), total = page.total, "Fetched entries");
            return Ok(entries);
        }
    }
}
