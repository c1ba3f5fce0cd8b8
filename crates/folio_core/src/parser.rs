use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, Span};
use crate::config::{RenderOptions, UnterminatedCode};
use crate::inline::parse_spans;

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]+)\. (.*)$").unwrap());

/// Parse markdown text into a list of blocks using the default options.
pub fn parse(markdown: &str) -> Vec<Block> {
    parse_with(markdown, &RenderOptions::default())
}

/// Parse markdown text into a list of blocks.
///
/// Lines are scanned once, in order. Bullet lists, tables and code blocks
/// accumulate across lines and are pushed when the construct ends.
pub fn parse_with(markdown: &str, options: &RenderOptions) -> Vec<Block> {
    let mut state = ParseState::default();
    let mut blocks = Vec::new();
    let mut line_count = 0usize;

    for line in markdown.lines() {
        process_line(line, &mut state, &mut blocks);
        line_count += 1;
    }
    finish(state, options, &mut blocks);

    log::debug!("parsed {line_count} lines into {} blocks", blocks.len());
    blocks
}

/// The multi-line construct currently open. At most one is open at a time.
#[derive(Debug, Default)]
enum ParseState {
    #[default]
    Idle,
    List {
        items: Vec<Vec<Span>>,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Code {
        language: Option<String>,
        lines: Vec<String>,
    },
}

impl ParseState {
    /// Push an open list or table and return to idle. An open code block is
    /// left untouched; only a closing fence or `finish` ends it.
    fn flush(&mut self, blocks: &mut Vec<Block>) {
        match std::mem::take(self) {
            ParseState::Idle => {}
            ParseState::List { items } => blocks.push(Block::BulletList { items }),
            ParseState::Table { header, rows } => blocks.push(Block::Table { header, rows }),
            code @ ParseState::Code { .. } => *self = code,
        }
    }
}

struct Fence {
    language: Option<String>,
}

fn process_line(line: &str, state: &mut ParseState, blocks: &mut Vec<Block>) {
    // Code fences toggle the code state
    if let Some(fence) = parse_fence(line) {
        match std::mem::take(state) {
            ParseState::Code { language, lines } => {
                blocks.push(Block::CodeBlock { language, lines });
            }
            open => {
                *state = open;
                state.flush(blocks);
                *state = ParseState::Code {
                    language: fence.language,
                    lines: Vec::new(),
                };
            }
        }
        return;
    }

    // Everything inside a fence is verbatim
    if let ParseState::Code { lines, .. } = state {
        lines.push(line.to_string());
        return;
    }

    if line == "---" {
        state.flush(blocks);
        blocks.push(Block::HorizontalRule);
        return;
    }

    if let Some(text) = line.strip_prefix("## ") {
        state.flush(blocks);
        blocks.push(Block::Heading2 {
            text: text.to_string(),
        });
        return;
    }

    if let Some(text) = line.strip_prefix("### ") {
        state.flush(blocks);
        blocks.push(Block::Heading3 {
            text: text.to_string(),
        });
        return;
    }

    // Tables
    if is_table_row(line) {
        let cells = split_cells(line);
        match state {
            ParseState::Table { rows, .. } => {
                if !is_separator_row(&cells) {
                    rows.push(cells);
                }
            }
            _ => {
                state.flush(blocks);
                *state = ParseState::Table {
                    header: cells,
                    rows: Vec::new(),
                };
            }
        }
        return;
    }
    if matches!(state, ParseState::Table { .. }) {
        state.flush(blocks);
    }

    // Bullet lists
    if let Some(item) = line.strip_prefix("- ") {
        match state {
            ParseState::List { items } => items.push(parse_spans(item)),
            _ => {
                *state = ParseState::List {
                    items: vec![parse_spans(item)],
                }
            }
        }
        return;
    }
    state.flush(blocks);

    if let Some(caps) = NUMBERED.captures(line) {
        blocks.push(Block::NumberedItem {
            index: caps[1].to_string(),
            spans: parse_spans(&caps[2]),
        });
        return;
    }

    if line.trim().is_empty() {
        return;
    }

    blocks.push(Block::Paragraph {
        spans: parse_spans(line),
    });
}

fn finish(state: ParseState, options: &RenderOptions, blocks: &mut Vec<Block>) {
    match state {
        ParseState::Code { language, lines } => match options.unterminated_code {
            UnterminatedCode::Discard => {
                log::warn!(
                    "discarding unterminated code block ({} lines)",
                    lines.len()
                );
            }
            UnterminatedCode::Flush => {
                log::warn!("closing unterminated code block at end of input");
                blocks.push(Block::CodeBlock { language, lines });
            }
        },
        mut open => open.flush(blocks),
    }
}

/// A line of exactly three backticks, optionally followed by a language tag.
fn parse_fence(line: &str) -> Option<Fence> {
    let rest = line.strip_prefix("```")?;
    if rest.contains('`') {
        return None;
    }
    let tag = rest.trim();
    Some(Fence {
        language: (!tag.is_empty()).then(|| tag.to_string()),
    })
}

fn is_table_row(line: &str) -> bool {
    line.starts_with('|') && line.ends_with('|')
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(String::from)
        .collect()
}

fn is_separator_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|cell| cell.chars().all(|ch| ch == '-' || ch == ':'))
}
