use serde::Serialize;

/// Inline text spans. Bold and code never nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Bold(String),
    Code(String),
}

impl Span {
    /// Inner text with delimiters already stripped.
    pub fn text(&self) -> &str {
        match self {
            Span::Text(text) | Span::Bold(text) | Span::Code(text) => text,
        }
    }
}

/// Block-level elements produced by the line scanner, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading2 {
        text: String,
    },
    Heading3 {
        text: String,
    },
    HorizontalRule,
    Paragraph {
        spans: Vec<Span>,
    },
    /// A single `N. text` line. Consecutive numbered lines are not grouped.
    NumberedItem {
        index: String,
        spans: Vec<Span>,
    },
    BulletList {
        items: Vec<Vec<Span>>,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    CodeBlock {
        /// Tag after the opening fence, if any. Not interpreted by the scanner.
        language: Option<String>,
        lines: Vec<String>,
    },
}

impl Block {
    /// Short name of the variant, the same as its serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading2 { .. } => "heading2",
            Block::Heading3 { .. } => "heading3",
            Block::HorizontalRule => "horizontal_rule",
            Block::Paragraph { .. } => "paragraph",
            Block::NumberedItem { .. } => "numbered_item",
            Block::BulletList { .. } => "bullet_list",
            Block::Table { .. } => "table",
            Block::CodeBlock { .. } => "code_block",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn span_text_strips_nothing_further() {
        assert_eq!(Span::Bold("x".into()).text(), "x");
        assert_eq!(Span::Code("`".into()).text(), "`");
    }

    #[test]
    fn serializes_with_type_tags() {
        let block = Block::Paragraph {
            spans: vec![Span::Text("a ".into()), Span::Bold("b".into())],
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "paragraph",
                "spans": [
                    { "type": "text", "text": "a " },
                    { "type": "bold", "text": "b" },
                ],
            })
        );
        let rule = serde_json::to_value(Block::HorizontalRule).unwrap();
        assert_eq!(rule, serde_json::json!({ "type": "horizontal_rule" }));
    }

    #[test]
    fn kind_matches_serialized_tag() {
        let blocks = [
            Block::Heading2 { text: "a".into() },
            Block::Heading3 { text: "a".into() },
            Block::HorizontalRule,
            Block::Paragraph { spans: vec![] },
            Block::NumberedItem {
                index: "1".into(),
                spans: vec![],
            },
            Block::BulletList { items: vec![] },
            Block::Table {
                header: vec![],
                rows: vec![],
            },
            Block::CodeBlock {
                language: None,
                lines: vec![],
            },
        ];
        for block in blocks {
            let json = serde_json::to_value(&block).unwrap();
            assert_eq!(json["type"], block.kind());
        }
    }
}
