pub mod browser;
pub mod collector;
pub mod http;
pub mod reverb;
pub mod traits;
pub mod types;

pub use browser::BrowserSource;
pub use collector::Collector;
pub use http::HttpSource;
pub use traits::PageSource;
pub use types::{CollectorConfig, Credentials, Driver, SiteSelectors};
