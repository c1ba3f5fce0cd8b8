use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use folio_core::store::{Content, ContentStore, DirectoryStore};
use folio_core::{Config, UnterminatedCode};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Render portfolio markdown into blocks, HTML or Typst")]
struct Cli {
    /// Config file (defaults are used if it does not exist)
    #[arg(short, long, global = true, default_value = "folio.toml")]
    config: PathBuf,

    /// Emit code fences left open at end of input instead of dropping them
    #[arg(long, global = true)]
    flush_unterminated_code: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markdown file
    Render {
        /// Input Markdown file
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Html)]
        format: Format,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render one item from a content directory, metadata first
    Show {
        /// Content id (file stem of `<id>.md`)
        id: String,

        #[arg(short = 'd', long)]
        content_dir: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },
    /// List the items in a content directory
    List {
        #[arg(short = 'd', long)]
        content_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Debug dump of the parsed blocks
    Blocks,
    Json,
    Html,
    Typst,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(&cli.config)?;
    if cli.flush_unterminated_code {
        config.render.unterminated_code = UnterminatedCode::Flush;
    }

    match cli.command {
        Command::Render {
            input,
            format,
            output,
        } => {
            let markdown = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let rendered = render(&markdown, format, &config)?;
            write_output(output.as_deref(), &rendered)
        }
        Command::Show {
            id,
            content_dir,
            format,
        } => {
            let store = DirectoryStore::new(content_dir);
            let Some(content) = store.get(&id)? else {
                bail!("no content {id:?} in {}", store.root().display());
            };
            print!("{}", show(&content, format, &config)?);
            Ok(())
        }
        Command::List { content_dir } => {
            let store = DirectoryStore::new(content_dir);
            for id in store.ids()? {
                if let Some(content) = store.get(&id)? {
                    let meta = &content.metadata;
                    println!("{}\t{}\t{}", content.id, meta.date, meta.title);
                }
            }
            Ok(())
        }
    }
}

fn render(markdown: &str, format: Format, config: &Config) -> anyhow::Result<String> {
    let blocks = folio_core::parse_with(markdown, &config.render);
    log::info!("rendering {} blocks", blocks.len());

    Ok(match format {
        Format::Blocks => format!("{blocks:#?}\n"),
        Format::Json => serde_json::to_string_pretty(&blocks)? + "\n",
        Format::Html => folio_core::blocks_to_html(&blocks, config),
        Format::Typst => folio_core::blocks_to_typst(&blocks, config),
    })
}

/// Metadata header followed by the rendered body. JSON output stays a
/// single document, so it gets no header.
fn show(content: &Content, format: Format, config: &Config) -> anyhow::Result<String> {
    let body = render(&content.body, format, config)?;
    Ok(match format {
        Format::Json => body,
        _ => header(content) + &body,
    })
}

fn header(content: &Content) -> String {
    let meta = &content.metadata;
    let mut out = format!("# {}\n", meta.title);
    if !meta.date.is_empty() {
        out.push_str(&format!("date: {}\n", meta.date));
    }
    if let Some(category) = &meta.category {
        out.push_str(&format!("category: {category}\n"));
    }
    if !meta.tags.is_empty() {
        out.push_str(&format!("tags: {}\n", meta.tags.join(", ")));
    }
    if !meta.description.is_empty() {
        out.push_str(&format!("{}\n", meta.description));
    }
    out.push('\n');
    out
}

fn write_output(output: Option<&Path>, rendered: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            println!("Created {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
