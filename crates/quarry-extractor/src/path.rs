//! Nested field path resolution
//!
//! A path is a dot-separated list of segments. A segment may end with a
//! bracketed index (`items[2]`), which indexes into the array named by the
//! part before the bracket. There is no escaping: a literal `.` or `[` in a
//! field name cannot be addressed.

use serde_json::Value;

/// Resolve `path` against `object`
///
/// Returns `None` as soon as any segment is absent; never panics.
///
/// # Examples
///
/// ```
/// use quarry_extractor::resolve_path;
/// use serde_json::json;
///
/// let entry = json!({"fields": {"tags": ["a", "b"]}});
/// assert_eq!(resolve_path(&entry, "fields.tags[1]"), Some(&json!("b")));
/// assert_eq!(resolve_path(&entry, "fields.missing.deeper"), None);
/// ```
pub fn resolve_path<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(object, |current, segment| resolve_segment(current, segment))
}

fn resolve_segment<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match parse_indexed(segment) {
        Some((name, index)) => current.get(name)?.as_array()?.get(index?),
        None => current.get(segment),
    }
}

/// Split `name[3]` into `("name", Some(3))`
///
/// Returns `None` when the segment has no bracket pair. An index that does
/// not start with digits is reported as `Some((name, None))`.
fn parse_indexed(segment: &str) -> Option<(&str, Option<usize>)> {
    if !segment.contains(']') {
        return None;
    }
    let (name, rest) = segment.split_once('[')?;
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        &rest[..end]
    };
    Some((name, digits.parse().ok()))
}

/// Final segment of a path, used as the field label
///
/// ```
/// use quarry_extractor::path::field_name;
///
/// assert_eq!(field_name("fields.body"), "body");
/// assert_eq!(field_name("title"), "title");
/// ```
pub fn field_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
