mod block;
mod config;
mod html;
mod inline;
mod parser;
pub mod store;
mod typst;

pub use block::{Block, Span};
pub use config::{Config, ConfigError, HtmlConfig, RenderOptions, TypstConfig, UnterminatedCode};
pub use inline::parse_spans;
pub use parser::parse_with;

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Render blocks as an HTML fragment.
pub fn blocks_to_html(blocks: &[Block], config: &Config) -> String {
    html::blocks_to_html(blocks, &config.html)
}

/// Render blocks as Typst markup.
pub fn blocks_to_typst(blocks: &[Block], config: &Config) -> String {
    typst::blocks_to_typst(blocks, &config.typst)
}

/// Convert markdown to HTML using default config.
pub fn markdown_to_html(markdown: &str) -> String {
    markdown_to_html_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to HTML with custom config.
pub fn markdown_to_html_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse_with(markdown, &config.render);
    blocks_to_html(&blocks, config)
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse_with(markdown, &config.render);
    blocks_to_typst(&blocks, config)
}
