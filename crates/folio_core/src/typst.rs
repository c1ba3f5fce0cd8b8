use crate::block::{Block, Span};
use crate::config::TypstConfig;

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[Block], config: &TypstConfig) -> String {
    let mut out = String::new();

    out.push_str("#set par(linebreaks: \"optimized\")\n\n");

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        if is_heading(block) && config.keep_headings_with_content {
            // Keep heading with following content using a block that prevents breaks
            out.push_str("#block(breakable: false)[\n");
            emit_block(block, &mut out);

            if i + 1 < blocks.len() {
                i += 1;
                emit_block(&blocks[i], &mut out);
            }
            out.push_str("]\n\n");
        } else {
            emit_block(block, &mut out);
        }

        i += 1;
    }

    out
}

fn is_heading(block: &Block) -> bool {
    matches!(block, Block::Heading2 { .. } | Block::Heading3 { .. })
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading2 { text } => emit_heading(2, text, out),
        Block::Heading3 { text } => emit_heading(3, text, out),
        Block::Paragraph { spans } => {
            spans_to_typst(spans, out);
            out.push_str("\n\n");
        }
        Block::NumberedItem { index, spans } => {
            // Explicit numbering, since items are never grouped into a list
            out.push_str(index);
            out.push_str(". ");
            spans_to_typst(spans, out);
            out.push_str("\n\n");
        }
        Block::BulletList { items } => {
            // Small lists stay together, long ones may break across pages
            let small = items.len() <= 5;
            if small {
                out.push_str("#block(breakable: false)[\n");
            }
            for item in items {
                out.push_str("- ");
                spans_to_typst(item, out);
                out.push('\n');
            }
            if small {
                out.push_str("]\n\n");
            } else {
                out.push('\n');
            }
        }
        Block::Table { header, rows } => {
            out.push_str("#block(breakable: false)[\n");
            table_to_typst(header, rows, out);
            out.push_str("]\n\n");
        }
        Block::CodeBlock { language, lines } => {
            let fence = raw_fence(lines);
            out.push_str("#block(breakable: false)[\n");
            out.push_str(&fence);
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&fence);
            out.push_str("\n]\n\n");
        }
        Block::HorizontalRule => {
            out.push_str("#line(length: 100%)\n\n");
        }
    }
}

fn emit_heading(level: usize, text: &str, out: &mut String) {
    out.push_str(&"=".repeat(level));
    out.push(' ');
    escape_into(text, out);
    out.push_str("\n\n");
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    for span in spans {
        match span {
            Span::Text(text) => escape_into(text, out),
            Span::Bold(text) => {
                out.push('*');
                escape_into(text, out);
                out.push('*');
            }
            Span::Code(text) => {
                out.push('`');
                out.push_str(text);
                out.push('`');
            }
        }
    }
}

/// Escape characters that are markup in Typst
fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        let escape = match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '/' | '~' => true,
            // Heading and list markers only count at the start of a line
            '=' | '+' | '-' => at_line_start(out),
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// Only whitespace has been written on the current line so far.
fn at_line_start(out: &str) -> bool {
    let line = out.rsplit_once('\n').map_or(out, |(_, tail)| tail);
    line.trim().is_empty()
}

/// A backtick fence longer than any backtick run inside the code.
fn raw_fence(lines: &[String]) -> String {
    let longest = lines
        .iter()
        .flat_map(|line| line.split(|ch: char| ch != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn table_to_typst(header: &[String], rows: &[Vec<String>], out: &mut String) {
    let col_count = header.len();
    if col_count == 0 {
        return;
    }

    out.push_str("#table(\n");
    out.push_str(&format!("  columns: {},\n", col_count));

    for cell in header {
        out.push_str("  [*");
        escape_into(cell, out);
        out.push_str("*],\n");
    }

    // Pad or truncate ragged rows so cells stay in their columns
    for row in rows {
        for col in 0..col_count {
            out.push_str("  [");
            if let Some(cell) = row.get(col) {
                escape_into(cell, out);
            }
            out.push_str("],\n");
        }
    }

    out.push_str(")\n");
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, TypstConfig};
    use crate::{markdown_to_typst, markdown_to_typst_with_config};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const PREAMBLE: &str = "#set par(linebreaks: \"optimized\")\n\n";

    #[test]
    fn heading() {
        assert_eq!(
            markdown_to_typst("## Hello"),
            format!("{PREAMBLE}#block(breakable: false)[\n== Hello\n\n]\n\n")
        );
    }

    #[test]
    fn heading_with_following_content() {
        let result = markdown_to_typst("### Title\n\nSome text.");
        assert!(result.contains("#block(breakable: false)[\n=== Title\n\nSome text.\n\n]\n\n"));
    }

    #[test]
    fn heading_grouping_can_be_disabled() {
        let config = Config {
            typst: TypstConfig {
                keep_headings_with_content: false,
            },
            ..Config::compiled_default()
        };
        assert_eq!(
            markdown_to_typst_with_config("## A\nb", &config),
            format!("{PREAMBLE}== A\n\nb\n\n")
        );
    }

    #[test]
    fn paragraph() {
        assert_eq!(
            markdown_to_typst("Hello world"),
            format!("{PREAMBLE}Hello world\n\n")
        );
    }

    #[test]
    fn bold_and_code() {
        assert_eq!(
            markdown_to_typst("**bold** and `code`"),
            format!("{PREAMBLE}*bold* and `code`\n\n")
        );
    }

    #[test]
    fn numbered_item_keeps_its_index() {
        assert_eq!(
            markdown_to_typst("3. third"),
            format!("{PREAMBLE}3. third\n\n")
        );
    }

    #[test]
    fn code_block() {
        assert_eq!(
            markdown_to_typst("```rust\nlet x = 1;\n```"),
            format!("{PREAMBLE}#block(breakable: false)[\n```rust\nlet x = 1;\n```\n]\n\n")
        );
    }

    #[test]
    fn bullet_list() {
        assert_eq!(
            markdown_to_typst("- one\n- two"),
            format!("{PREAMBLE}#block(breakable: false)[\n- one\n- two\n]\n\n")
        );
    }

    #[test]
    fn long_bullet_list_is_breakable() {
        let md = (1..=6).map(|n| format!("- {n}")).collect::<Vec<_>>().join("\n");
        assert_eq!(
            markdown_to_typst(&md),
            format!("{PREAMBLE}- 1\n- 2\n- 3\n- 4\n- 5\n- 6\n\n")
        );
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(markdown_to_typst("a # b"), format!("{PREAMBLE}a \\# b\n\n"));
        assert_eq!(markdown_to_typst("a_b"), format!("{PREAMBLE}a\\_b\n\n"));
        assert_eq!(markdown_to_typst("a * b"), format!("{PREAMBLE}a \\* b\n\n"));
    }

    #[rstest]
    #[case::line_comment("and // that", "and \\/\\/ that")]
    #[case::block_comment("keep /* this", "keep \\/\\* this")]
    #[case::heading_marker("= not a heading", "\\= not a heading")]
    #[case::enum_marker("+ not a list", "\\+ not a list")]
    #[case::term_marker("/ term: text", "\\/ term: text")]
    #[case::dash_start("-x", "\\-x")]
    #[case::indented_marker("  = deep", "  \\= deep")]
    #[case::tilde("a~b", "a\\~b")]
    #[case::mid_line_markers("a = b + c - d", "a = b + c - d")]
    fn escapes_line_markup(#[case] md: &str, #[case] expected: &str) {
        assert_eq!(markdown_to_typst(md), format!("{PREAMBLE}{expected}\n\n"));
    }

    #[test]
    fn markers_after_heading_grouping_are_escaped() {
        assert!(markdown_to_typst("## H\n= x").contains("== H\n\n\\= x\n\n"));
    }

    #[test]
    fn code_fence_outgrows_backtick_runs() {
        let md = "```\nlet s = \"```\";\nlet t = \"````\";\n```";
        assert_eq!(
            markdown_to_typst(md),
            format!(
                "{PREAMBLE}#block(breakable: false)[\n`````\nlet s = \"```\";\nlet t = \"````\";\n`````\n]\n\n"
            )
        );
    }

    #[test]
    fn table() {
        let md = "| A | B |\n|---|---|\n| 1 | 2 |";
        let expected = format!(
            "{PREAMBLE}#block(breakable: false)[\n#table(\n  columns: 2,\n  [*A*],\n  [*B*],\n  [1],\n  [2],\n)\n]\n\n"
        );
        assert_eq!(markdown_to_typst(md), expected);
    }

    #[test]
    fn ragged_table_rows_are_padded() {
        let md = "| A | B |\n| 1 |";
        assert!(markdown_to_typst(md).contains("  [1],\n  [],\n)"));
    }

    #[test]
    fn horizontal_rule() {
        assert_eq!(
            markdown_to_typst("---"),
            format!("{PREAMBLE}#line(length: 100%)\n\n")
        );
    }
}
