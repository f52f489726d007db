use anyhow::{Context, Result};
use clap::Parser;
use colored_json::prelude::*;
use serde::Serialize;
use spree_options::config::{Config, default_config_path, load_config};
use spree_options::{Document, expand_document};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

static EXAMPLES: &str = r"EXAMPLES:
    Print the options of a saved product response:
    spree-options product.json

    Read the response from stdin:
    curl -s 'https://shop.example/api/v2/storefront/products/tee?include=variants.option_values,option_types' | spree-options

    Compact, uncolored output:
    spree-options --compact --no-color product.json";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Collect product options from a Spree JSON:API response",
    long_about = None,
    after_help = EXAMPLES
)]
struct Args {
    /// JSON:API document to read, `-` or nothing for stdin
    file: Option<PathBuf>,

    /// Config file (default: ~/.config/spree-options/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Disable colored JSON output
    #[arg(long, default_value_t = false)]
    no_color: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let config = match args.config.or_else(default_config_path) {
        Some(path) => load_config(&path)?,
        None => Config::default(),
    };

    let document = read_document(args.file.as_deref())?;
    let products = expand_document(&document).context("Failed to expand product options")?;

    let pretty = config.output.pretty && !args.compact;
    let color = config.output.color && !args.no_color && std::io::stdout().is_terminal();
    print_json(&products, pretty, color)
}

fn read_document(file: Option<&Path>) -> Result<Document> {
    let content = match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    serde_json::from_str(&content).context("Failed to parse JSON:API document")
}

fn print_json<T: Serialize>(data: &T, pretty: bool, color: bool) -> Result<()> {
    let json_string = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };

    if color {
        println!("{}", json_string.to_colored_json_auto()?);
    } else {
        println!("{json_string}");
    }

    Ok(())
}
