//! Extraction from Reverb price-guide pages.
//!
//! Search pages list links to guide pages; each guide page carries a
//! transaction table of dated sales with condition and asking/final price.

use crate::models::RawListing;
use crate::scrapers::types::SiteSelectors;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {:?}", css, e))
}

/// [`SiteSelectors`] compiled for `scraper`
#[derive(Debug, Clone)]
pub struct PageSelectors {
    anchor: Selector,
    rel_next: Selector,
    title: Selector,
    date: Selector,
    condition: Selector,
    price: Selector,
    seller: Selector,
    description: Selector,
    guide_path_marker: String,
    next_link_text: String,
}

impl PageSelectors {
    pub fn new(site: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            anchor: parse_selector("a[href]")?,
            rel_next: parse_selector(r#"a[rel="next"][href]"#)?,
            title: parse_selector(&site.title)?,
            date: parse_selector(&site.date)?,
            condition: parse_selector(&site.condition)?,
            price: parse_selector(&site.price)?,
            seller: parse_selector(&site.seller)?,
            description: parse_selector(&site.description)?,
            guide_path_marker: site.guide_path_marker.clone(),
            next_link_text: site.next_link_text.clone(),
        })
    }
}

/// Element text with whitespace collapsed
fn text_of(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Table body cells matching `selector`; `th` header cells are skipped
fn cells(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .filter(|el| el.value().name() != "th")
        .map(text_of)
        .collect()
}

fn cell(column: &[String], i: usize) -> String {
    column.get(i).cloned().unwrap_or_default()
}

fn absolutize(base: &Url, href: &str) -> Option<Url> {
    let mut url = base.join(href.trim()).ok()?;
    url.set_fragment(None);
    Some(url)
}

/// Guide page links in document order, without repeats
pub fn extract_guide_links(html: &str, base: &Url, selectors: &PageSelectors) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    document
        .select(&selectors.anchor)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| absolutize(base, href))
        .map(String::from)
        .filter(|url| url.contains(&selectors.guide_path_marker))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// The next search page, from `rel="next"` or a link labelled like "Next"
pub fn extract_next_page(html: &str, base: &Url, selectors: &PageSelectors) -> Option<String> {
    let document = Html::parse_document(html);

    let href = document
        .select(&selectors.rel_next)
        .next()
        .or_else(|| {
            document
                .select(&selectors.anchor)
                .find(|a| text_of(*a).eq_ignore_ascii_case(&selectors.next_link_text))
        })?
        .value()
        .attr("href")?;

    absolutize(base, href).map(String::from)
}

/// Last path segment of a guide URL, used to key its rows
fn page_slug(page_url: &str) -> String {
    Url::parse(page_url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_string))
        })
        .unwrap_or_else(|| "listing".to_string())
}

/// One [`RawListing`] per sale-date cell on a guide page.
///
/// Condition and seller cells line up with dates by position. Price cells
/// come in asking/final pairs per row. Missing cells become empty text.
pub fn extract_sales(
    html: &str,
    page_url: &str,
    scraped_at: &str,
    selectors: &PageSelectors,
) -> Vec<RawListing> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selectors.title)
        .next()
        .map(text_of)
        .unwrap_or_default();
    let description = document
        .select(&selectors.description)
        .next()
        .map(text_of)
        .unwrap_or_default();

    let dates = cells(&document, &selectors.date);
    let conditions = cells(&document, &selectors.condition);
    let prices = cells(&document, &selectors.price);
    let sellers = cells(&document, &selectors.seller);

    let slug = page_slug(page_url);

    dates
        .iter()
        .enumerate()
        .map(|(i, date)| RawListing {
            listing_id: format!("{}-{}", slug, i),
            url: page_url.to_string(),
            title: title.clone(),
            date: date.clone(),
            condition: cell(&conditions, i),
            asking_price: cell(&prices, 2 * i),
            price: cell(&prices, 2 * i + 1),
            seller: sellers.get(i).filter(|s| !s.is_empty()).cloned(),
            description: description.clone(),
            scraped_at: scraped_at.to_string(),
        })
        .collect()
}
