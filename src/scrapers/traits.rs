use crate::scrapers::types::{Credentials, SiteSelectors};
use anyhow::Result;
use async_trait::async_trait;

/// Narrow seam between the collector and whatever loads pages.
///
/// Extraction works on the returned HTML, so the collector can be driven by
/// a browser, plain HTTP, or canned pages in tests.
#[async_trait(?Send)]
pub trait PageSource {
    /// Log in before scraping. Sources that cannot sign in may just warn.
    async fn sign_in(
        &self,
        sign_in_url: &str,
        credentials: &Credentials,
        selectors: &SiteSelectors,
    ) -> Result<()>;

    /// Load `url` and return its rendered HTML.
    ///
    /// `ready_selector` marks the content the caller is after. Sources wait
    /// for it on a best-effort basis; its absence is not an error.
    async fn fetch(&self, url: &str, ready_selector: &str) -> Result<String>;

    /// Get the name of the page source
    fn source_name(&self) -> &'static str;
}
