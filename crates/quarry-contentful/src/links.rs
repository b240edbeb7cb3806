//! Resolution of `Link` references against a page's `includes`
//!
//! The REST API returns references as
//! `{"sys": {"type": "Link", "linkType": "Entry", "id": "..."}}` and ships the
//! linked records separately. Resolution replaces each link with a resolved
//! copy of its record, producing a plain tree. A link stays a link when:
//!
//! - its record is already being resolved higher up the same branch
//! - its record is not in the page
//! - it sits deeper than the `include` level of the query
//! - the item has used up its expansion budget

use crate::client::{EntryPage, EntryQuery};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

/// Link depth when the query does not set `include`
pub const DEFAULT_INCLUDE_DEPTH: usize = 1;

/// Deepest `include` level the API accepts
pub const MAX_INCLUDE_DEPTH: usize = 10;

/// Most records expanded into a single resolved item
pub const MAX_EXPANSIONS: usize = 1_000;

type RecordKey<'a> = (&'a str, &'a str);

/// Index of every record available to a page
#[derive(Debug)]
pub struct LinkResolver<'a> {
    records: HashMap<RecordKey<'a>, &'a Value>,
    max_depth: usize,
}

/// State of one item's resolution
struct Walk<'v> {
    path: Vec<RecordKey<'v>>,
    depth: usize,
    budget: usize,
    exhausted: bool,
}

impl<'a> LinkResolver<'a> {
    /// Index the items and includes of `page`
    pub fn new(page: &'a EntryPage) -> Self {
        let entries = page.items.iter().chain(&page.includes.entries);
        let mut records = HashMap::new();
        for record in entries.chain(&page.includes.assets) {
            if let Some(key) = record_key(record) {
                records.entry(key).or_insert(record);
            }
        }
        Self {
            records,
            max_depth: DEFAULT_INCLUDE_DEPTH,
        }
    }

    /// Index `page`, following links as deep as `query` asked the API to include
    pub fn for_query(page: &'a EntryPage, query: &EntryQuery) -> Self {
        Self::new(page).with_max_depth(include_depth(query))
    }

    /// Follow at most `depth` links from an item, capped at [`MAX_INCLUDE_DEPTH`]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.min(MAX_INCLUDE_DEPTH);
        self
    }

    /// Resolved copies of the page items
    pub fn resolve_items(&self, items: &[Value]) -> Vec<Value> {
        items.iter().map(|item| self.resolve(item)).collect()
    }

    /// Resolved copy of `value`
    pub fn resolve(&self, value: &Value) -> Value {
        let mut walk = Walk {
            path: Vec::new(),
            depth: 0,
            budget: MAX_EXPANSIONS,
            exhausted: false,
        };
        let resolved = self.resolve_inner(value, &mut walk);
        if walk.exhausted {
            warn!(
                id = value.pointer("/sys/id").and_then(serde_json::Value::as_str).unwrap_or_default(),
                limit = MAX_EXPANSIONS,
                "Link expansion limit reached, deeper links left unresolved"
            );
        }
        resolved
    }

    fn resolve_inner<'v>(&self, value: &'v Value, walk: &mut Walk<'v>) -> Value
    where
        'a: 'v,
    {
        match value {
            Value::Array(items) => Value::Array(
                items.iter().map(|item| self.resolve_inner(item, walk)).collect(),
            ),
            Value::Object(map) => {
                if let Some(key) = link_key(value) {
                    return self.follow(value, key, walk);
                }

                let own = record_key(value);
                if let Some(key) = own {
                    walk.path.push(key);
                }
                let resolved: Map<String, Value> = map
                    .iter()
                    .map(|(k, v)| {
                        // `sys` never holds links worth following
                        let v = if k == "sys" { v.clone() } else { self.resolve_inner(v, walk) };
                        (k.clone(), v)
                    })
                    .collect();
                if own.is_some() {
                    walk.path.pop();
                }
                Value::Object(resolved)
            }
            other => other.clone(),
        }
    }

    fn follow<'v>(&self, link: &'v Value, key: RecordKey<'v>, walk: &mut Walk<'v>) -> Value
    where
        'a: 'v,
    {
        if walk.depth >= self.max_depth || walk.path.contains(&key) {
            return link.clone();
        }
        let records: &HashMap<RecordKey<'v>, &'v Value> = &self.records;
        let Some(record) = records.get(&key).copied() else {
            return link.clone();
        };
        if walk.budget == 0 {
            walk.exhausted = true;
            return link.clone();
        }

        walk.budget -= 1;
        walk.depth += 1;
        let resolved = self.resolve_inner(record, walk);
        walk.depth -= 1;
        resolved
    }
}

/// `include` of the query as a link depth
///
/// The API accepts the value as a number or a numeric string.
fn include_depth(query: &EntryQuery) -> usize {
    let depth = match query.get("include") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    depth.map_or(DEFAULT_INCLUDE_DEPTH, |d| d.min(MAX_INCLUDE_DEPTH as u64) as usize)
}

/// `(linkType, id)` of a link object
fn link_key(value: &Value) -> Option<RecordKey<'_>> {
    let sys = value.get("sys")?;
    if sys.get("type")?.as_str()? != "Link" {
        return None;
    }
    Some((sys.get("linkType")?.as_str()?, sys.get("id")?.as_str()?))
}

/// `(type, id)` of an entry or asset record
fn record_key(value: &Value) -> Option<RecordKey<'_>> {
    let sys = value.get("sys")?;
    let kind = sys.get("type")?.as_str()?;
    if kind != "Entry" && kind != "Asset" {
        return None;
    }
    Some((kind, sys.get("id")?.as_str()?))
}
