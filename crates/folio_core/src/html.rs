use std::collections::HashMap;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::block::{Block, Span};
use crate::config::HtmlConfig;

/// Convert blocks to an HTML fragment, one element per block.
pub fn blocks_to_html(blocks: &[Block], config: &HtmlConfig) -> String {
    let mut out = String::new();
    let mut ids = HeadingIds::default();

    for block in blocks {
        match block {
            Block::Heading2 { text } => emit_heading("h2", text, config, &mut ids, &mut out),
            Block::Heading3 { text } => emit_heading("h3", text, config, &mut ids, &mut out),
            Block::HorizontalRule => out.push_str("<hr>\n"),
            Block::Paragraph { spans } => {
                out.push_str("<p>");
                spans_to_html(spans, &mut out);
                out.push_str("</p>\n");
            }
            Block::NumberedItem { index, spans } => {
                out.push_str("<p class=\"numbered\"><span class=\"index\">");
                out.push_str(&encode_text(index));
                out.push_str(".</span> ");
                spans_to_html(spans, &mut out);
                out.push_str("</p>\n");
            }
            Block::BulletList { items } => {
                out.push_str("<ul>\n");
                for item in items {
                    out.push_str("<li>");
                    spans_to_html(item, &mut out);
                    out.push_str("</li>\n");
                }
                out.push_str("</ul>\n");
            }
            Block::Table { header, rows } => table_to_html(header, rows, &mut out),
            Block::CodeBlock { language, lines } => {
                out.push_str("<pre><code");
                if let Some(lang) = language {
                    out.push_str(" class=\"language-");
                    out.push_str(&encode_double_quoted_attribute(lang));
                    out.push('"');
                }
                out.push('>');
                out.push_str(&encode_text(&lines.join("\n")));
                out.push_str("</code></pre>\n");
            }
        }
    }

    out
}

fn emit_heading(
    tag: &str,
    text: &str,
    config: &HtmlConfig,
    ids: &mut HeadingIds,
    out: &mut String,
) {
    out.push('<');
    out.push_str(tag);
    if config.heading_ids {
        let id = ids.next(text);
        if !id.is_empty() {
            out.push_str(" id=\"");
            out.push_str(&encode_double_quoted_attribute(&id));
            out.push('"');
        }
    }
    out.push('>');
    out.push_str(&encode_text(text));
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}

fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        match span {
            Span::Text(text) => out.push_str(&encode_text(text)),
            Span::Bold(text) => {
                out.push_str("<strong>");
                out.push_str(&encode_text(text));
                out.push_str("</strong>");
            }
            Span::Code(text) => {
                out.push_str("<code>");
                out.push_str(&encode_text(text));
                out.push_str("</code>");
            }
        }
    }
}

fn table_to_html(header: &[String], rows: &[Vec<String>], out: &mut String) {
    out.push_str("<table>\n<thead>\n<tr>");
    for cell in header {
        out.push_str("<th>");
        out.push_str(&encode_text(cell));
        out.push_str("</th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            out.push_str(&encode_text(cell));
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

/// Hands out anchor ids for headings, suffixing repeats with `-2`, `-3`, ...
#[derive(Default)]
struct HeadingIds {
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    fn next(&mut self, text: &str) -> String {
        let slug = slugify(text);
        if slug.is_empty() {
            return slug;
        }
        let count = self.seen.entry(slug.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            slug
        } else {
            format!("{slug}-{count}")
        }
    }
}

/// Lowercase alphanumerics joined by single dashes.
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if dash && !slug.is_empty() {
                slug.push('-');
            }
            dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            dash = true;
        }
    }
    slug
}
