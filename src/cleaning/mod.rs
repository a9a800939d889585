pub mod condition;
pub mod date;
pub mod price;
pub mod vocab;
pub mod year;

pub use vocab::{BrandEntry, Matcher, Vocabulary};

use crate::config::CleanerConfig;
use crate::models::{CleanListing, RawListing};
use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use year::YearRange;

/// Why a raw row did not make it into the clean table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DropReason {
    #[error("unparseable price {0:?}")]
    UnparseablePrice(String),
    #[error("price {price:.2} below minimum {min:.2}")]
    BelowMinimum { price: f64, min: f64 },
    #[error("price {price:.2} above maximum {max:.2}")]
    AboveMaximum { price: f64, max: f64 },
}

/// Result of a cleaning pass
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Kept rows, in input order
    pub rows: Vec<CleanListing>,
    /// `(listing_id, reason)` for every dropped row
    pub dropped: Vec<(String, DropReason)>,
}

/// Per-row normalization of raw listings
pub struct Cleaner {
    matcher: Matcher,
    min_year: i32,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

impl Cleaner {
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        Ok(Self {
            matcher: Matcher::new(&config.vocabulary)?,
            min_year: config.min_year,
            min_price: config.min_price,
            max_price: config.max_price,
        })
    }

    fn check_bounds(&self, price: f64) -> Result<(), DropReason> {
        if let Some(min) = self.min_price {
            if price < min {
                return Err(DropReason::BelowMinimum { price, min });
            }
        }
        if let Some(max) = self.max_price {
            if price > max {
                return Err(DropReason::AboveMaximum { price, max });
            }
        }
        Ok(())
    }

    /// Clean one row against `reference`, the time ages are measured from.
    ///
    /// Without a reference the age is absent and the year ceiling falls
    /// back to the listing date's year, then to 2099.
    pub fn clean(
        &self,
        raw: &RawListing,
        reference: Option<DateTime<Utc>>,
    ) -> Result<CleanListing, DropReason> {
        let price = price::parse_price(&raw.price)
            .ok_or_else(|| DropReason::UnparseablePrice(raw.price.clone()))?;
        self.check_bounds(price)?;

        let title = raw.title.trim();
        let listing_date = date::parse_listing_date(&raw.date);
        let age_days = match (listing_date, reference) {
            (Some(listed), Some(reference)) => date::age_days(listed, reference),
            _ => None,
        };

        let max_year = reference
            .map(|r| r.year())
            .or(listing_date.map(|d| d.year()))
            .unwrap_or(2099);
        let year = year::extract_year(
            title,
            &raw.description,
            YearRange {
                min: self.min_year,
                max: max_year,
            },
        );

        let (brand, model) = self.matcher.brand_and_model(title, &raw.description);

        Ok(CleanListing {
            listing_id: raw.listing_id.clone(),
            title: title.to_string(),
            price,
            asking_price: price::parse_price(&raw.asking_price),
            brand,
            model,
            year,
            color: self.matcher.color(title),
            condition: self.matcher.condition(&raw.condition),
            listing_date,
            age_days,
        })
    }

    /// Clean every row. `as_of` pins the reference time; otherwise each row
    /// is measured from its own `scraped_at`.
    pub fn clean_all(&self, rows: &[RawListing], as_of: Option<DateTime<Utc>>) -> CleanReport {
        info!("🧹 Cleaning {} raw listings", rows.len());

        let mut report = CleanReport::default();
        for raw in rows {
            let reference = as_of.or_else(|| {
                DateTime::parse_from_rfc3339(raw.scraped_at.trim())
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            });
            if reference.is_none() {
                debug!("No reference time for {}, age left empty", raw.listing_id);
            }

            match self.clean(raw, reference) {
                Ok(clean) => report.rows.push(clean),
                Err(reason) => {
                    warn!("Dropped {}: {}", raw.listing_id, reason);
                    report.dropped.push((raw.listing_id.clone(), reason));
                }
            }
        }

        info!(
            "✅ Kept {} listings, dropped {}",
            report.rows.len(),
            report.dropped.len()
        );
        report
    }
}
