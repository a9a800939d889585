pub mod cleaning;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod storage;

pub use config::ScoutConfig;
pub use models::{CleanListing, Condition, RawListing};
