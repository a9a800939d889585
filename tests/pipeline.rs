use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use guitar_scout::pipeline::{run_clean, run_collect};
use guitar_scout::scrapers::{Collector, Credentials, PageSource, SiteSelectors};
use guitar_scout::{storage, CleanListing, RawListing, ScoutConfig};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

const START: &str = "https://reverb.com/price-guide/electric-guitars";

/// Canned pages keyed by URL; anything else fails like a dead page load
#[derive(Default)]
struct FixtureSource {
    pages: HashMap<String, String>,
    fetched: RefCell<Vec<String>>,
    signed_in: RefCell<Option<String>>,
}

impl FixtureSource {
    fn with(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait(?Send)]
impl<'a> PageSource for &'a FixtureSource {
    async fn sign_in(
        &self,
        _sign_in_url: &str,
        credentials: &Credentials,
        _selectors: &SiteSelectors,
    ) -> Result<()> {
        *self.signed_in.borrow_mut() = Some(credentials.username.clone());
        Ok(())
    }

    async fn fetch(&self, url: &str, _ready_selector: &str) -> Result<String> {
        self.fetched.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("page load timed out: {}", url))
    }

    fn source_name(&self) -> &'static str {
        "fixture"
    }
}

fn search_page(links: &[&str], next: Option<&str>) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">guide</a>"#, l))
        .collect();
    let next = next
        .map(|n| format!(r#"<a href="{}">Next</a>"#, n))
        .unwrap_or_default();
    format!("<html><body>{}{}</body></html>", anchors, next)
}

fn guide_page(title: &str, sales: &[(&str, &str, &str, &str)]) -> String {
    let rows: String = sales
        .iter()
        .map(|(date, condition, asking, final_price)| {
            format!(
                r#"<tr><td class="date">{}</td><td class="condition">{}</td>
                   <td class="price-history-table-price">{}</td>
                   <td class="price-history-table-price">{}</td></tr>"#,
                date, condition, asking, final_price
            )
        })
        .collect();
    format!(
        r#"<html><body><h1 class="heading-1">{}</h1>
           <table><thead><tr><th class="date">Date</th><th class="condition">Condition</th></tr></thead>
           <tbody>{}</tbody></table></body></html>"#,
        title, rows
    )
}

fn fixture_site() -> FixtureSource {
    FixtureSource::default()
        .with(
            START,
            &search_page(
                &["/price-guide/guide/1-fender-stratocaster", "/price-guide/guide/2-gibson-sg"],
                Some("/price-guide/electric-guitars?page=2"),
            ),
        )
        .with(
            "https://reverb.com/price-guide/electric-guitars?page=2",
            &search_page(
                &["/price-guide/guide/2-gibson-sg", "/price-guide/guide/3-mystery"],
                None,
            ),
        )
        .with(
            "https://reverb.com/price-guide/guide/1-fender-stratocaster",
            &guide_page(
                "1965 Fender Stratocaster Sunburst",
                &[
                    ("Jan 12, 2019", "Very Good", "$1,400.00", "$1,299.00"),
                    ("Dec 3, 2018", "Mint", "FREE", "N/A"),
                ],
            ),
        )
        .with(
            "https://reverb.com/price-guide/guide/2-gibson-sg",
            &guide_page(
                "Gibson SG Standard '69 Cherry",
                &[("Nov 30, 2018", "Poor", "$900", "$850.00")],
            ),
        )
        .with(
            "https://reverb.com/price-guide/guide/3-mystery",
            "<html><body><h1 class=\"heading-1\">Mystery</h1><p>No sales yet</p></body></html>",
        )
}

fn config_in(dir: &Path) -> ScoutConfig {
    let mut config = ScoutConfig::default();
    config.paths.raw_file = dir.join("raw_listings.csv");
    config.paths.clean_file = dir.join("clean_listings.csv");
    config.collector.start_url = START.to_string();
    config
}

fn read_clean(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let headers = rdr.headers().unwrap().iter().map(String::from).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

#[tokio::test]
async fn collects_then_cleans_fixture_site() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let site = fixture_site();
    let scraped_at = Utc.with_ymd_and_hms(2019, 2, 1, 10, 0, 0).unwrap();

    let count = run_collect(&site, &config, scraped_at).await.unwrap();
    assert_eq!(count, 3);

    // The SG guide is linked from both search pages but visited once
    let fetched = site.fetched.borrow();
    assert_eq!(
        fetched.iter().filter(|u| u.ends_with("2-gibson-sg")).count(),
        1
    );
    drop(fetched);

    let raw = storage::read_raw(&config.paths.raw_file).await.unwrap();
    assert_eq!(raw.rows.len(), 3);
    assert_eq!(raw.rows[0].listing_id, "1-fender-stratocaster-0");
    assert_eq!(raw.rows[0].scraped_at, "2019-02-01T10:00:00Z");

    let report = run_clean(&config, None).await.unwrap();
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].0, "1-fender-stratocaster-1");

    let (headers, rows) = read_clean(&config.paths.clean_file);
    assert_eq!(headers, CleanListing::HEADERS);
    assert_eq!(rows.len(), 2);

    let price_col = headers.iter().position(|h| h == "price").unwrap();
    for row in &rows {
        let price: f64 = row[price_col].parse().unwrap();
        assert!(price >= 0.0);
    }

    let strat = &rows[0];
    assert_eq!(strat[2], "1299.00");
    assert_eq!(strat[3], "1400.00");
    assert_eq!(strat[4], "Fender");
    assert_eq!(strat[5], "Stratocaster");
    assert_eq!(strat[6], "1965");
    assert_eq!(strat[7], "Sunburst");
    assert_eq!(strat[8], "very_good");
    assert_eq!(strat[10], "2019-01-12");
    assert_eq!(strat[11], "20");

    let sg = &rows[1];
    assert_eq!(sg[4], "Gibson");
    assert_eq!(sg[5], "SG");
    assert_eq!(sg[6], "1969");
    assert_eq!(sg[8], "poor");
    assert!(sg[9].parse::<u8>().unwrap() < strat[9].parse::<u8>().unwrap());
}

#[tokio::test]
async fn cleaning_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let site = fixture_site();
    let scraped_at = Utc.with_ymd_and_hms(2019, 2, 1, 10, 0, 0).unwrap();

    run_collect(&site, &config, scraped_at).await.unwrap();

    run_clean(&config, None).await.unwrap();
    let first = std::fs::read(&config.paths.clean_file).unwrap();
    run_clean(&config, None).await.unwrap();
    let second = std::fs::read(&config.paths.clean_file).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_raw_file_gives_header_only_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    storage::write_raw(&config.paths.raw_file, &[]).await.unwrap();

    let report = run_clean(&config, None).await.unwrap();
    assert!(report.rows.is_empty());

    let text = std::fs::read_to_string(&config.paths.clean_file).unwrap();
    assert_eq!(text, format!("{}\n", CleanListing::HEADERS.join(",")));
}

#[tokio::test]
async fn missing_raw_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    assert!(run_clean(&config, None).await.is_err());
    assert!(!config.paths.clean_file.exists());
}

#[tokio::test]
async fn failed_page_load_halts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let site = FixtureSource::default().with(
        START,
        &search_page(&["/price-guide/guide/404-gone"], None),
    );

    let result = run_collect(&site, &config, Utc::now()).await;
    assert!(result.is_err());
    assert!(!config.paths.raw_file.exists());
}

#[tokio::test]
async fn pagination_respects_max_pages_and_signs_in() {
    let mut config = config_in(Path::new("unused"));
    config.collector.max_pages = 1;
    config.collector.credentials = Some(Credentials {
        username: "player@example.com".to_string(),
        password: "hunter2".to_string(),
    });
    let site = fixture_site();

    let collector = Collector::new(&site, config.collector.clone()).unwrap();
    let links = collector.collect_guide_links().await.unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(site.fetched.borrow().len(), 1);

    let rows: Vec<RawListing> = collector
        .collect(Utc.with_ymd_and_hms(2019, 2, 1, 0, 0, 0).unwrap())
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(site.signed_in.borrow().as_deref(), Some("player@example.com"));
}

#[tokio::test]
async fn pagination_stops_when_next_loops_back() {
    let mut config = config_in(Path::new("unused"));
    config.collector.max_pages = 50;
    let page_two = "https://reverb.com/price-guide/electric-guitars?page=2";
    let site = FixtureSource::default()
        .with(
            START,
            &search_page(
                &["/price-guide/guide/1-fender-stratocaster"],
                Some("/price-guide/electric-guitars?page=2"),
            ),
        )
        .with(
            page_two,
            &search_page(
                &["/price-guide/guide/2-gibson-sg"],
                Some("/price-guide/electric-guitars"),
            ),
        );

    let collector = Collector::new(&site, config.collector.clone()).unwrap();
    let links = collector.collect_guide_links().await.unwrap();

    assert_eq!(links.len(), 2);
    assert_eq!(*site.fetched.borrow(), vec![START.to_string(), page_two.to_string()]);
}
