use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use page_perception::browser::ChromeBrowser;
use page_perception::dom::layout::{CapturedLayout, StaticLayout};
use page_perception::dom::{extract_main_text, DomProcessor, Snapshot};
use page_perception::{BrowserTrait, Config, PageIdentity, ProfileKind};
use scraper::Html;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "page-perception", version, about = "Extract interactive elements and selectors from web pages")]
struct Cli {
    /// Print single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract from saved markup without a browser
    Snapshot {
        /// HTML file, or `-` for stdin
        #[arg(long)]
        html: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        title: String,
        /// Layout samples captured alongside the markup
        #[arg(long)]
        layout: Option<PathBuf>,
        #[arg(long, value_enum)]
        profile: Option<ProfileKind>,
        #[arg(long)]
        no_timestamp: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load a URL in Chrome and extract from the rendered page
    Capture {
        url: String,
        #[arg(long, value_enum)]
        profile: Option<ProfileKind>,
        /// Show the browser window
        #[arg(long)]
        headed: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the main readable text of saved markup
    Content {
        #[arg(long)]
        html: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Snapshot {
            html,
            url,
            title,
            layout,
            profile,
            no_timestamp,
            config,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(profile) = profile {
                config.extraction.profile = profile;
            }
            if no_timestamp {
                config.extraction.include_timestamp = false;
            }

            let markup = read_input(&html)?;
            let processor = DomProcessor::new(config.extraction);
            let identity = PageIdentity::new(url, title);
            let snapshot = match layout {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading layout {}", path.display()))?;
                    let layout = CapturedLayout::from_json(&raw)?;
                    processor.extract(identity, &markup, &layout)
                }
                None => processor.extract(identity, &markup, &StaticLayout),
            };
            print_snapshot(&snapshot, cli.compact)?;
        }
        Command::Capture {
            url,
            profile,
            headed,
            config,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(profile) = profile {
                config.extraction.profile = profile;
            }
            if headed {
                config.browser.headless = false;
            }

            let mut browser = ChromeBrowser::new();
            browser.launch(&config.browser).await?;
            let tab = browser.new_tab().await?;

            info!(url = %url, "navigating");
            browser.navigate(&tab, &url).await?;

            let snapshot = DomProcessor::new(config.extraction).capture(&browser, &tab).await;
            browser.close().await?;
            print_snapshot(&snapshot, cli.compact)?;
        }
        Command::Content { html } => {
            let markup = read_input(&html)?;
            println!("{}", extract_main_text(&Html::parse_document(&markup)));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None => Ok(Config::default()),
    }
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading markup from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {}", source))
    }
}

fn print_snapshot(snapshot: &Snapshot, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(snapshot)?
    } else {
        snapshot.to_json_pretty()?
    };
    println!("{}", json);
    Ok(())
}
