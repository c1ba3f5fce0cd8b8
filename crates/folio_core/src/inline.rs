use std::sync::LazyLock;

use regex::Regex;

use crate::block::Span;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*[^*]+\*\*").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]+`").unwrap());

/// Split one line of text into inline spans.
///
/// Bold runs are found first across the whole line; only the text between
/// them is scanned for inline code. Unmatched delimiters stay in the plain
/// text. Empty plain segments between adjacent matches are dropped.
pub fn parse_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for m in BOLD.find_iter(text) {
        push_code_spans(&text[last..m.start()], &mut spans);
        spans.push(Span::Bold(strip_delimiters(m.as_str(), 2).to_string()));
        last = m.end();
    }
    push_code_spans(&text[last..], &mut spans);

    spans
}

fn push_code_spans(text: &str, spans: &mut Vec<Span>) {
    let mut last = 0;

    for m in CODE.find_iter(text) {
        push_text(&text[last..m.start()], spans);
        spans.push(Span::Code(strip_delimiters(m.as_str(), 1).to_string()));
        last = m.end();
    }
    push_text(&text[last..], spans);
}

fn push_text(text: &str, spans: &mut Vec<Span>) {
    if !text.is_empty() {
        spans.push(Span::Text(text.to_string()));
    }
}

// Delimiters are ASCII, so byte slicing stays on char boundaries.
fn strip_delimiters(matched: &str, width: usize) -> &str {
    &matched[width..matched.len() - width]
}
