//! End-to-end tests: JSON configuration to documents

#[cfg(test)]
mod tests {
    use crate::{DocumentAssembler, LoaderConfig, SourceContext, TextChunker, ChunkStrategy};
    use quarry_domain::TextSplitter;
    use serde_json::{json, Value};

    const BLOG_CONFIG: &str = r#"{
        "mainContentType": {
            "contentType": "blogPost",
            "fieldsToParse": ["fields.title", "fields.hero", "fields.body", "fields.authors", "fields.tags"]
        },
        "embeddedContentTypes": [
            { "contentType": "author", "fieldsToParse": ["fields.name"] },
            { "contentType": "codeBlock", "fieldsToParse": ["fields.language", "fields.code"] }
        ],
        "richTextParsingRules": {
            "embedded-asset-block": false,
            "embedded-entry-block": true,
            "embedded-entry-inline": true
        },
        "fieldsForCitation": { "titleField": "fields.title", "slugField": "fields.slug", "urlPrefix": "https://blog.test/posts/" }
    }"#;

    fn sys(id: &str, content_type: &str) -> Value {
        json!({"type": "Entry", "id": id, "contentType": {"sys": {"id": content_type}}})
    }

    fn text(value: &str) -> Value {
        json!({"nodeType": "text", "value": value, "marks": [], "data": {}})
    }

    fn blog_post() -> Value {
        json!({
            "sys": sys("post1", "blogPost"),
            "fields": {
                "title": "Shipping \"fast\"",
                "slug": "shipping-fast",
                "hero": {
                    "sys": {"type": "Asset", "id": "hero"},
                    "fields": {"title": "Rocket", "file": {"url": "//images.test/rocket.png"}}
                },
                "body": {
                    "nodeType": "document",
                    "data": {},
                    "content": [
                        {"nodeType": "heading-2", "data": {}, "content": [text("Setup")]},
                        {"nodeType": "paragraph", "data": {}, "content": [
                            text("Install with "),
                            {"nodeType": "embedded-entry-inline", "content": [], "data": {"target": {
                                "sys": sys("cb1", "codeBlock"),
                                "fields": {"language": "sh", "code": "cargo install quarry"}
                            }}},
                            text(" first.")
                        ]},
                        {"nodeType": "embedded-asset-block", "content": [], "data": {"target": {
                            "sys": {"type": "Asset", "id": "diagram"},
                            "fields": {"title": "Diagram", "file": {"url": "//images.test/d.png"}}
                        }}},
                        {"nodeType": "paragraph", "data": {}, "content": [text("Done.")]}
                    ]
                },
                "authors": [
                    {"sys": sys("a1", "author"), "fields": {"name": "Ada"}},
                    {"sys": sys("a2", "author"), "fields": {"name": "Grace"}}
                ],
                "tags": ["rust", "release"]
            }
        })
    }

    #[test]
    fn test_full_blog_post() {
        let config = LoaderConfig::from_json(BLOG_CONFIG).unwrap();
        let context = SourceContext::new("sp", "master");
        let assembler = DocumentAssembler::new(&config, &context, true);

        let doc = assembler.build(&blog_post());

        let expected = concat!(
            "title: Shipping fast\n\n",
            "hero: ![Rocket](https://images.test/rocket.png)\n\n",
            "body: Setup\nInstall with language: sh\n\ncode: cargo install quarry\n\n first.\nDone.\n\n",
            "authors: name: Ada\n\n, name: Grace\n\n\n\n",
            "tags: rust, release\n\n",
        );
        assert_eq!(doc.text, expected);
        assert_eq!(doc.metadata_str("title"), Some("Shipping \"fast\""));
        assert_eq!(doc.metadata_str("source"), Some("https://blog.test/posts/shipping-fast"));
        assert_eq!(doc.metadata_str("contentType"), Some("blogPost"));
    }

    #[test]
    fn test_disabled_inline_entries_vanish() {
        let mut config = LoaderConfig::from_json(BLOG_CONFIG).unwrap();
        config.rich_text_parsing_rules.set(crate::EMBEDDED_ENTRY_INLINE, false);
        config.main_content_type.fields_to_parse = vec!["fields.body".to_string()];
        let context = SourceContext::new("sp", "master");
        let assembler = DocumentAssembler::new(&config, &context, false);

        let doc = assembler.build(&blog_post());

        assert_eq!(doc.text, "Setup\nInstall with  first.\nDone.\n\n");
    }

    #[test]
    fn test_malformed_config_renders_nothing() {
        let config = LoaderConfig::parse_or_default("{\"mainContentType\": ");
        let context = SourceContext::new("sp", "master");
        let assembler = DocumentAssembler::new(&config, &context, true);

        let doc = assembler.build(&blog_post());

        assert_eq!(doc.text, "");
        assert_eq!(doc.metadata_str("contentType"), Some(""));
        assert_eq!(doc.metadata_str("source"), Some("https://www.example.com/shipping-fast"));
    }

    #[test]
    fn test_self_referencing_link_is_not_followed() {
        // A link left unresolved renders as its JSON object
        let config = LoaderConfig::from_json(
            r#"{"mainContentType": {"contentType": "page", "fieldsToParse": ["fields.parent"]},
                "embeddedContentTypes": [{"contentType": "page", "fieldsToParse": ["fields.parent"]}]}"#,
        )
        .unwrap();
        let context = SourceContext::new("sp", "master");
        let assembler = DocumentAssembler::new(&config, &context, false);
        let entry = json!({
            "sys": sys("p1", "page"),
            "fields": {"parent": {"sys": {"type": "Link", "linkType": "Entry", "id": "p1"}}}
        });

        let doc = assembler.build(&entry);

        assert!(doc.text.contains("\"Link\""));
        assert!(doc.text.ends_with("\n\n"));
    }

    #[test]
    fn test_assembled_documents_split_with_metadata() {
        let config = LoaderConfig::from_json(BLOG_CONFIG).unwrap();
        let context = SourceContext::new("sp", "master");
        let assembler = DocumentAssembler::new(&config, &context, true);
        let docs = assembler.build_all(&[blog_post()]);

        let chunker = TextChunker::new(ChunkStrategy::ByParagraph, 60);
        let chunks = chunker.split_documents(&docs);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 60));
        assert!(chunks.iter().all(|c| c.metadata_str("entryId") == Some("post1")));
    }
}
