//! Rich-text flattening
//!
//! Walks a rich-text tree and concatenates its text. Embedded entries whose
//! content type has a configuration are rendered through a projection
//! callback; everything else is flattened structurally.
//!
//! Divisor rule: after a child that produced text, the block divisor is
//! appended only when the immediately following sibling is a block node. The
//! lookahead is the next array element, even when that element is later
//! skipped by the parsing rules.

use crate::config::{find_config, ContentTypeConfig, RichTextParsingRules};
use crate::error::{Skip, SkipReason};
use crate::value::{asset_target, content_type_id, embedded_target, is_block, node_type, NodeKind};
use serde_json::Value;
use tracing::warn;

/// Callback that renders an embedded entry with a matched configuration
pub type ProjectFn<'a> = dyn Fn(&Value, &ContentTypeConfig) -> Result<String, Skip> + 'a;

/// Rules applied while flattening
#[derive(Debug, Clone, Copy)]
pub struct FlattenRules<'a> {
    /// Per-node-type inclusion flags
    pub parsing: &'a RichTextParsingRules,
    /// Configurations for embedded entries
    pub embedded: &'a [ContentTypeConfig],
}

/// Flatten the children of `node` into one string
///
/// Returns a skip when `node` has no `content` array.
pub fn flatten(
    node: &Value,
    divisor: &str,
    rules: &FlattenRules<'_>,
    project: &ProjectFn<'_>,
) -> Result<String, Skip> {
    let children = node
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| Skip::new(SkipReason::MissingContent, node_type(node).to_string()))?;

    let mut text = String::new();

    for (i, child) in children.iter().enumerate() {
        let child_type = node_type(child);
        if !rules.parsing.is_enabled(child_type) {
            continue;
        }

        let rendered = match render_child(child, divisor, rules, project) {
            Ok(rendered) => rendered,
            Err(skip) => {
                warn!(node_type = child_type, "Skipping rich-text node: {}", skip);
                continue;
            }
        };

        if rendered.is_empty() {
            continue;
        }

        text.push_str(&rendered);
        if children.get(i + 1).is_some_and(is_block) {
            text.push_str(divisor);
        }
    }

    Ok(text)
}

fn render_child(
    child: &Value,
    divisor: &str,
    rules: &FlattenRules<'_>,
    project: &ProjectFn<'_>,
) -> Result<String, Skip> {
    match NodeKind::classify(child) {
        NodeKind::Text(value) => Ok(value.to_string()),
        NodeKind::EmbeddedAsset => asset_target(child)?.marker(),
        NodeKind::EmbeddedEntry => {
            let target = embedded_target(child)?;
            if target.get("sys").is_none() {
                return Err(Skip::new(SkipReason::MissingSys, node_type(child).to_string()));
            }
            let config = content_type_id(target).and_then(|id| find_config(rules.embedded, id));
            match config {
                Some(config) => project(target, config),
                None => flatten(child, divisor, rules, project),
            }
        }
        NodeKind::Block | NodeKind::Inline => flatten(child, divisor, rules, project),
        NodeKind::Unknown => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EMBEDDED_ASSET_BLOCK;
    use serde_json::json;
    use std::cell::RefCell;

    fn text(value: &str) -> Value {
        json!({"nodeType": "text", "value": value, "marks": [], "data": {}})
    }

    fn paragraph(children: Vec<Value>) -> Value {
        json!({"nodeType": "paragraph", "data": {}, "content": children})
    }

    fn hyperlink(children: Vec<Value>) -> Value {
        json!({"nodeType": "hyperlink", "data": {"uri": "https://x"}, "content": children})
    }

    fn document(children: Vec<Value>) -> Value {
        json!({"nodeType": "document", "data": {}, "content": children})
    }

    fn no_project(_: &Value, _: &ContentTypeConfig) -> Result<String, Skip> {
        panic!("projection not expected")
    }

    fn run(doc: &Value, divisor: &str, parsing: &RichTextParsingRules) -> String {
        let rules = FlattenRules {
            parsing,
            embedded: &[],
        };
        flatten(doc, divisor, &rules, &no_project).unwrap()
    }

    #[test]
    fn test_adjacent_paragraphs() {
        let doc = document(vec![paragraph(vec![text("Hello")]), paragraph(vec![text("World")])]);
        assert_eq!(run(&doc, " ", &RichTextParsingRules::default()), "Hello World");
    }

    #[test]
    fn test_trailing_block_gets_no_divisor() {
        let doc = document(vec![paragraph(vec![text("Only")])]);
        assert_eq!(run(&doc, "\n", &RichTextParsingRules::default()), "Only");
    }

    #[test]
    fn test_inline_siblings_get_no_divisor() {
        let doc = document(vec![paragraph(vec![
            text("Read "),
            hyperlink(vec![text("the docs")]),
            text(" today"),
        ])]);
        assert_eq!(run(&doc, "|", &RichTextParsingRules::default()), "Read the docs today");
    }

    #[test]
    fn test_divisor_depends_on_next_sibling_only() {
        // Only nodes followed by a block get a divisor
        let doc = document(vec![
            text("a"),
            paragraph(vec![text("b")]),
            text("c"),
            paragraph(vec![text("d")]),
            text("e"),
        ]);
        assert_eq!(run(&doc, "|", &RichTextParsingRules::default()), "a|bc|de");
    }

    #[test]
    fn test_empty_child_emits_no_divisor() {
        let doc = document(vec![
            paragraph(vec![]),
            paragraph(vec![text("x")]),
            paragraph(vec![text("y")]),
        ]);
        assert_eq!(run(&doc, "\n", &RichTextParsingRules::default()), "x\ny");
    }

    #[test]
    fn test_missing_content_is_skip() {
        let rules = RichTextParsingRules::default();
        let flatten_rules = FlattenRules {
            parsing: &rules,
            embedded: &[],
        };
        let skip = flatten(&json!({"nodeType": "document"}), " ", &flatten_rules, &no_project).unwrap_err();
        assert_eq!(skip.reason, SkipReason::MissingContent);
        assert!(flatten(&Value::Null, " ", &flatten_rules, &no_project).is_err());
    }

    #[test]
    fn test_child_without_content_contributes_nothing() {
        let doc = document(vec![
            json!({"nodeType": "paragraph"}),
            paragraph(vec![text("kept")]),
        ]);
        assert_eq!(run(&doc, " ", &RichTextParsingRules::default()), "kept");
    }

    fn asset_block() -> Value {
        json!({
            "nodeType": "embedded-asset-block",
            "content": [],
            "data": {"target": {
                "sys": {"type": "Asset", "id": "img"},
                "fields": {"title": "Diagram", "file": {"url": "//cdn/diagram.png"}}
            }}
        })
    }

    #[test]
    fn test_embedded_asset_marker() {
        let doc = document(vec![paragraph(vec![text("See")]), asset_block()]);
        assert_eq!(
            run(&doc, "\n", &RichTextParsingRules::default()),
            "See\n![Diagram](https://cdn/diagram.png)"
        );
    }

    #[test]
    fn test_disabled_asset_contributes_nothing() {
        let rules = RichTextParsingRules::default().with(EMBEDDED_ASSET_BLOCK, false);
        let doc = document(vec![asset_block(), paragraph(vec![text("after")])]);
        assert_eq!(run(&doc, "\n", &rules), "after");
    }

    #[test]
    fn test_lookahead_sees_skipped_block() {
        // The next element is a disabled asset block, still counted as a block
        let rules = RichTextParsingRules::default().with(EMBEDDED_ASSET_BLOCK, false);
        let doc = document(vec![text("before"), asset_block()]);
        assert_eq!(run(&doc, "\n", &rules), "before\n");
    }

    fn entry_block(content_type: &str, inner: Vec<Value>) -> Value {
        json!({
            "nodeType": "embedded-entry-block",
            "content": inner,
            "data": {"target": {
                "sys": {"type": "Entry", "id": "e1", "contentType": {"sys": {"id": content_type}}},
                "fields": {"name": "Ada", "role": "Engineer"}
            }}
        })
    }

    #[test]
    fn test_embedded_entry_uses_projection() {
        let parsing = RichTextParsingRules::default();
        let embedded = vec![ContentTypeConfig::new("person", ["fields.role", "fields.name"])];
        let rules = FlattenRules {
            parsing: &parsing,
            embedded: &embedded,
        };
        let seen = RefCell::new(Vec::new());
        let project = |entry: &Value, config: &ContentTypeConfig| -> Result<String, Skip> {
            seen.borrow_mut().push(config.content_type.clone());
            let fields = &entry["fields"];
            Ok(config
                .fields_to_parse
                .iter()
                .map(|p| fields[crate::path::field_name(p)].as_str().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(" / "))
        };

        let doc = document(vec![entry_block("person", vec![]), paragraph(vec![text("end")])]);
        let out = flatten(&doc, "\n", &rules, &project).unwrap();

        assert_eq!(out, "Engineer / Ada\nend");
        assert_eq!(*seen.borrow(), vec!["person".to_string()]);
    }

    #[test]
    fn test_unmatched_embedded_entry_recurses() {
        let doc = document(vec![entry_block("unknown", vec![text("fallback")])]);
        assert_eq!(run(&doc, "\n", &RichTextParsingRules::default()), "fallback");
    }

    #[test]
    fn test_embedded_entry_without_sys_is_skipped() {
        let doc = document(vec![
            json!({"nodeType": "embedded-entry-inline", "content": [], "data": {"target": {"fields": {}}}}),
            text("ok"),
        ]);
        assert_eq!(run(&doc, " ", &RichTextParsingRules::default()), "ok");
    }

    #[test]
    fn test_projection_skip_is_recovered() {
        let parsing = RichTextParsingRules::default();
        let embedded = vec![ContentTypeConfig::new("person", ["fields.name"])];
        let rules = FlattenRules {
            parsing: &parsing,
            embedded: &embedded,
        };
        let failing = |_: &Value, _: &ContentTypeConfig| -> Result<String, Skip> {
            Err(Skip::new(SkipReason::MissingSys, "e1"))
        };
        let doc = document(vec![entry_block("person", vec![]), paragraph(vec![text("still here")])]);
        assert_eq!(flatten(&doc, "\n", &rules, &failing).unwrap(), "still here");
    }
}
