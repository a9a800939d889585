use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One sale row as it appeared on a price-guide page, fields kept as text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawListing {
    pub listing_id: String,
    pub url: String,
    pub title: String,
    pub date: String,
    pub condition: String,
    pub asking_price: String,
    /// Final sale price
    pub price: String,
    pub seller: Option<String>,
    pub description: String,
    /// RFC 3339 extraction time
    pub scraped_at: String,
}

impl RawListing {
    /// Column order of the raw file. Matches the field order above.
    pub const HEADERS: [&'static str; 10] = [
        "listing_id",
        "url",
        "title",
        "date",
        "condition",
        "asking_price",
        "price",
        "seller",
        "description",
        "scraped_at",
    ];
}

/// Site condition grades, ordered worst to best.
///
/// `Unknown` is where unrecognized phrases land and sorts below every
/// recognized grade.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Unknown,
    NonFunctioning,
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
    Mint,
    BrandNew,
}

impl Condition {
    pub const ALL: [Condition; 9] = [
        Condition::Unknown,
        Condition::NonFunctioning,
        Condition::Poor,
        Condition::Fair,
        Condition::Good,
        Condition::VeryGood,
        Condition::Excellent,
        Condition::Mint,
        Condition::BrandNew,
    ];

    /// Ordinal used as the numeric model feature
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::Unknown => "unknown",
            Condition::NonFunctioning => "non_functioning",
            Condition::Poor => "poor",
            Condition::Fair => "fair",
            Condition::Good => "good",
            Condition::VeryGood => "very_good",
            Condition::Excellent => "excellent",
            Condition::Mint => "mint",
            Condition::BrandNew => "brand_new",
        }
    }
}

/// Model-ready row derived from a [`RawListing`]
#[derive(Debug, Clone, PartialEq)]
pub struct CleanListing {
    pub listing_id: String,
    pub title: String,
    pub price: f64,
    pub asking_price: Option<f64>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub condition: Condition,
    pub listing_date: Option<NaiveDate>,
    pub age_days: Option<i64>,
}

impl CleanListing {
    pub const HEADERS: [&'static str; 12] = [
        "listing_id",
        "title",
        "price",
        "asking_price",
        "brand",
        "model",
        "year",
        "color",
        "condition",
        "condition_rank",
        "listing_date",
        "age_days",
    ];

    /// Render as a clean-file record, aligned with [`CleanListing::HEADERS`]
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.listing_id.clone(),
            self.title.clone(),
            format!("{:.2}", self.price),
            self.asking_price
                .map(|p| format!("{:.2}", p))
                .unwrap_or_default(),
            self.brand.clone().unwrap_or_else(|| "unknown".to_string()),
            self.model.clone().unwrap_or_else(|| "unknown".to_string()),
            self.year.map(|y| y.to_string()).unwrap_or_default(),
            self.color.clone().unwrap_or_default(),
            self.condition.label().to_string(),
            self.condition.rank().to_string(),
            self.listing_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            self.age_days.map(|a| a.to_string()).unwrap_or_default(),
        ]
    }
}
