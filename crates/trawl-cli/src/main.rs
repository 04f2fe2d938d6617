//! trawl CLI - browser-driven Jira issue scraping
//!
//! Usage:
//!   trawl                         Scrape issues using .env configuration
//!   trawl --verbose               Same, with debug logging
//!   trawl --env-file ops/.env     Load configuration from a specific file
//!   trawl --headed                Run with a visible browser window

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;
use trawl_core::{Issue, Settings};
use trawl_scraper::{report, JiraScraper, Scraper};

#[derive(Parser)]
#[command(name = "trawl")]
#[command(version, about = "Browser-driven Jira issue scraper")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,

    /// Run the browser with a visible window, overriding HEADLESS
    #[arg(long)]
    headed: bool,

    /// Maximum login attempts before giving up
    #[arg(long, default_value = "2")]
    max_attempts: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        // A missing default .env is fine; the environment may already be set.
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    let mut settings = Settings::from_env();
    if cli.headed {
        settings.headless = false;
    }

    let issues = run_scrape(settings, cli.max_attempts).await?;
    report::print_issues(&issues);

    Ok(())
}

/// Run a full scrape, closing the browser session on every exit path
/// before any error is allowed to propagate.
async fn run_scrape(settings: Settings, max_attempts: usize) -> Result<Vec<Issue>> {
    let mut scraper = JiraScraper::launch_with_attempts(settings, max_attempts).await?;

    let outcome = scraper.scrape().await;

    if let Err(e) = scraper.close().await {
        warn!("Browser shutdown reported an error: {}", e);
    }

    outcome.context("scraping failed")
}
