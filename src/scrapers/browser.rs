use crate::scrapers::traits::PageSource;
use crate::scrapers::types::{CollectorConfig, Credentials, SiteSelectors};
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::cell::Cell;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Page source backed by a single headless Chrome tab
pub struct BrowserSource {
    // Keeps the Chrome process alive for as long as the tab is used
    _browser: Browser,
    tab: Arc<Tab>,
    ready_timeout: Duration,
    debug_dir: Option<PathBuf>,
    captured: Cell<bool>,
}

impl BrowserSource {
    /// Launch Chrome and open the tab every page load goes through
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        info!("Launching headless Chrome...");

        let page_timeout = Duration::from_secs(config.page_timeout_secs);
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .idle_browser_timeout(page_timeout * 2)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;
        tab.set_default_timeout(page_timeout);

        Ok(Self {
            _browser: browser,
            tab,
            ready_timeout: Duration::from_secs(config.ready_timeout_secs),
            debug_dir: config.debug_dir.clone(),
            captured: Cell::new(false),
        })
    }

    fn wait_ready(&self, selector: &str) -> bool {
        match self
            .tab
            .wait_for_element_with_custom_timeout(selector, self.ready_timeout)
        {
            Ok(_) => true,
            Err(e) => {
                debug!("{} not found within {:?}: {}", selector, self.ready_timeout, e);
                false
            }
        }
    }

    /// Save the first loaded page's HTML and a screenshot
    async fn capture_debug(&self, html: &str) -> Result<()> {
        let Some(dir) = &self.debug_dir else {
            return Ok(());
        };
        if self.captured.replace(true) {
            return Ok(());
        }

        tokio::fs::create_dir_all(dir).await?;

        let html_path = dir.join("first_page.html");
        tokio::fs::write(&html_path, html).await?;
        info!("Saved page HTML to {} ({} bytes)", html_path.display(), html.len());

        let screenshot = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .context("Failed to capture screenshot")?;
        let png_path = dir.join("first_page.png");
        tokio::fs::write(&png_path, screenshot).await?;
        info!("Saved screenshot to {}", png_path.display());

        Ok(())
    }
}

#[async_trait(?Send)]
impl PageSource for BrowserSource {
    async fn sign_in(
        &self,
        sign_in_url: &str,
        credentials: &Credentials,
        selectors: &SiteSelectors,
    ) -> Result<()> {
        info!("Signing in as {}...", credentials.username);

        self.tab
            .navigate_to(sign_in_url)
            .with_context(|| format!("Failed to open {}", sign_in_url))?
            .wait_until_navigated()?;

        self.tab
            .wait_for_element(&selectors.login_username)
            .context("Login form not found")?
            .click()?;
        self.tab.type_str(&credentials.username)?;

        self.tab
            .wait_for_element(&selectors.login_password)
            .context("Password field not found")?
            .click()?;
        self.tab.type_str(&credentials.password)?.press_key("Enter")?;

        if self.wait_ready(&selectors.signed_in) {
            info!("✅ Signed in");
        } else {
            warn!("Sign-in did not confirm in time, continuing anyway");
        }
        Ok(())
    }

    async fn fetch(&self, url: &str, ready_selector: &str) -> Result<String> {
        debug!("Opening {}", url);

        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to navigate to {}", url))?
            .wait_until_navigated()
            .with_context(|| format!("Page load failed for {}", url))?;

        self.wait_ready(ready_selector);

        let html = self
            .tab
            .get_content()
            .with_context(|| format!("Failed to read HTML from {}", url))?;
        debug!("Got {} bytes of HTML", html.len());

        self.capture_debug(&html).await?;
        Ok(html)
    }

    fn source_name(&self) -> &'static str {
        "headless Chrome"
    }
}
