use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use guitar_scout::pipeline::{run_clean, run_collect};
use guitar_scout::scrapers::{BrowserSource, Driver, HttpSource};
use guitar_scout::ScoutConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Used-guitar sale scraper and cleaner
#[derive(Parser)]
#[command(name = "guitar-scout", version)]
struct Cli {
    /// JSON config file (defaults to ./scout.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape sold listings into the raw file
    Collect,
    /// Turn the raw file into the model-ready clean file
    Clean {
        /// Measure listing ages from this RFC 3339 time instead of each row's scrape time
        #[arg(long)]
        as_of: Option<DateTime<Utc>>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ScoutConfig::load(cli.config.as_deref()).await?;

    info!("🎸 Guitar Scout");
    info!("==============");

    match cli.command {
        Command::Collect => {
            let scraped_at = Utc::now();
            let count = match config.collector.driver {
                Driver::Browser => {
                    let source = BrowserSource::new(&config.collector)?;
                    run_collect(source, &config, scraped_at).await?
                }
                Driver::Http => {
                    let source = HttpSource::new(&config.collector)?;
                    run_collect(source, &config, scraped_at).await?
                }
            };
            info!("Collected {} listings into {}", count, config.paths.raw_file.display());
        }
        Command::Clean { as_of } => {
            let report = run_clean(&config, as_of).await?;
            info!(
                "Wrote {} clean listings to {} ({} dropped)",
                report.rows.len(),
                config.paths.clean_file.display(),
                report.dropped.len()
            );
        }
    }

    Ok(())
}
