use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which page source drives the collector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    /// Headless Chrome, required for signed-in sold-price history
    Browser,
    /// Plain HTTP GET, public pages only
    Http,
}

/// Login for the price-guide site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// CSS selectors and link markers for the price-guide layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Substring identifying links to individual guide pages
    pub guide_path_marker: String,
    /// Anchor text of the pagination link
    pub next_link_text: String,
    /// Present once a search results page has rendered
    pub listing_ready: String,
    /// Present once a guide page's sales table has rendered
    pub guide_ready: String,
    pub title: String,
    pub date: String,
    pub condition: String,
    /// Price cells, alternating asking then final per row
    pub price: String,
    pub seller: String,
    pub description: String,
    pub login_username: String,
    pub login_password: String,
    /// Present once sign-in has completed
    pub signed_in: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            guide_path_marker: "/guide/".to_string(),
            next_link_text: "Next".to_string(),
            listing_ready: ".product-card-img-container".to_string(),
            guide_ready: ".date".to_string(),
            title: ".heading-1".to_string(),
            date: ".date".to_string(),
            condition: ".condition".to_string(),
            price: ".price-history-table-price".to_string(),
            seller: ".seller-location".to_string(),
            description: ".price-guide-description".to_string(),
            login_username: "#user_session_login".to_string(),
            login_password: "#user_session_password".to_string(),
            signed_in: ".site-header__avatar".to_string(),
        }
    }
}

/// Collector parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub driver: Driver,
    /// Used to resolve relative links
    pub base_url: String,
    /// First search results page
    pub start_url: String,
    pub sign_in_url: String,
    /// Upper bound on search pages walked
    pub max_pages: usize,
    pub page_timeout_secs: u64,
    /// How long to wait for a ready selector before reading the page anyway
    pub ready_timeout_secs: u64,
    pub headless: bool,
    pub credentials: Option<Credentials>,
    /// When set, the browser saves the first page's HTML and a screenshot here
    pub debug_dir: Option<PathBuf>,
    pub selectors: SiteSelectors,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            driver: Driver::Browser,
            base_url: "https://reverb.com".to_string(),
            start_url: "https://reverb.com/price-guide/electric-guitars".to_string(),
            sign_in_url: "https://reverb.com/signin".to_string(),
            max_pages: 213,
            page_timeout_secs: 60,
            ready_timeout_secs: 3,
            headless: true,
            credentials: None,
            debug_dir: None,
            selectors: SiteSelectors::default(),
        }
    }
}
