use crate::scrapers::traits::PageSource;
use crate::scrapers::types::{CollectorConfig, Credentials, SiteSelectors};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Page source using plain GET requests; no JavaScript, no login
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.page_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl PageSource for HttpSource {
    async fn sign_in(
        &self,
        _sign_in_url: &str,
        credentials: &Credentials,
        _selectors: &SiteSelectors,
    ) -> Result<()> {
        warn!(
            "HTTP source cannot sign in as {}; sold prices may be hidden",
            credentials.username
        );
        Ok(())
    }

    async fn fetch(&self, url: &str, _ready_selector: &str) -> Result<String> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch {}: {}", url, response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of HTML", html.len());
        Ok(html)
    }

    fn source_name(&self) -> &'static str {
        "HTTP"
    }
}
