use crate::models::RawListing;
use crate::scrapers::reverb::{extract_guide_links, extract_next_page, extract_sales, PageSelectors};
use crate::scrapers::traits::PageSource;
use crate::scrapers::types::CollectorConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// Single sequential pass over the price guide: search pages, then every
/// guide page they link to. Any page-load failure ends the run.
pub struct Collector<S: PageSource> {
    source: S,
    config: CollectorConfig,
    selectors: PageSelectors,
    base: Url,
}

impl<S: PageSource> Collector<S> {
    pub fn new(source: S, config: CollectorConfig) -> Result<Self> {
        let selectors = PageSelectors::new(&config.selectors)?;
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL {}", config.base_url))?;

        Ok(Self {
            source,
            config,
            selectors,
            base,
        })
    }

    /// Walk search pages from the start URL and gather guide links.
    ///
    /// Stops at `max_pages`, at the last page, or if a next link points
    /// back to a page already seen.
    pub async fn collect_guide_links(&self) -> Result<Vec<String>> {
        let mut links = Vec::new();
        let mut seen_links = HashSet::new();
        let mut visited = HashSet::new();
        let mut url = self.config.start_url.clone();

        for page in 1..=self.config.max_pages {
            if !visited.insert(url.clone()) {
                warn!("Pagination looped back to {}, stopping", url);
                break;
            }

            let html = self
                .source
                .fetch(&url, &self.config.selectors.listing_ready)
                .await
                .with_context(|| format!("Failed to load search page {} ({})", page, url))?;

            let page_base = Url::parse(&url).unwrap_or_else(|_| self.base.clone());
            let found = extract_guide_links(&html, &page_base, &self.selectors);
            let before = links.len();
            for link in found {
                if seen_links.insert(link.clone()) {
                    links.push(link);
                }
            }
            info!(
                "Search page {}: {} new guide links ({} total)",
                page,
                links.len() - before,
                links.len()
            );

            match extract_next_page(&html, &page_base, &self.selectors) {
                Some(next) => url = next,
                None => {
                    debug!("No next link on page {}", page);
                    break;
                }
            }
        }

        Ok(links)
    }

    /// Run the whole collection pass, stamping every row with `scraped_at`
    pub async fn collect(&self, scraped_at: DateTime<Utc>) -> Result<Vec<RawListing>> {
        info!("Collecting from {} via {}", self.config.start_url, self.source.source_name());

        if let Some(credentials) = &self.config.credentials {
            self.source
                .sign_in(&self.config.sign_in_url, credentials, &self.config.selectors)
                .await
                .context("Sign-in failed")?;
        }

        let links = self.collect_guide_links().await?;
        info!("Visiting {} guide pages", links.len());

        let stamp = scraped_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut listings = Vec::new();

        for (idx, link) in links.iter().enumerate() {
            let html = self
                .source
                .fetch(link, &self.config.selectors.guide_ready)
                .await
                .with_context(|| format!("Failed to load guide page {}", link))?;

            let sales = extract_sales(&html, link, &stamp, &self.selectors);
            if sales.is_empty() {
                debug!("[{}/{}] No sales on {}, skipping", idx + 1, links.len(), link);
                continue;
            }

            info!("[{}/{}] {} sales from {}", idx + 1, links.len(), sales.len(), link);
            listings.extend(sales);
        }

        info!("✅ Collected {} listings", listings.len());
        Ok(listings)
    }
}
