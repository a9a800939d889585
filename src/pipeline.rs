use crate::cleaning::{CleanReport, Cleaner};
use crate::config::ScoutConfig;
use crate::scrapers::{Collector, PageSource};
use crate::storage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

/// Collector stage: scrape through `source` and overwrite the raw file
pub async fn run_collect<S: PageSource>(
    source: S,
    config: &ScoutConfig,
    scraped_at: DateTime<Utc>,
) -> Result<usize> {
    let collector = Collector::new(source, config.collector.clone())?;
    let listings = collector.collect(scraped_at).await?;

    storage::write_raw(&config.paths.raw_file, &listings).await?;
    Ok(listings.len())
}

/// Cleaner stage: read the raw file, clean every row, overwrite the clean file
pub async fn run_clean(config: &ScoutConfig, as_of: Option<DateTime<Utc>>) -> Result<CleanReport> {
    let cleaner = Cleaner::new(&config.cleaner)?;
    let raw = storage::read_raw(&config.paths.raw_file).await?;

    let report = cleaner.clean_all(&raw.rows, as_of);
    storage::write_clean(&config.paths.clean_file, &report.rows).await?;

    if raw.skipped > 0 {
        info!("{} raw records were malformed and skipped", raw.skipped);
    }
    Ok(report)
}
