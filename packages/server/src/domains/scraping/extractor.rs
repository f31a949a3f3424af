use futures::future::join_all;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::models::{ExtraPage, PageLink, ScrapedPage};
use crate::common::{
    element_text, first_text, meta_content, select_all, select_first, truncate_chars,
    visible_text, FetchError,
};
use crate::kernel::BasePageFetcher;

lazy_static! {
    static ref SITE_URL_REGEX: Regex = Regex::new(r"^https?://.+\..+").expect("site url regex is valid");
}

/// Bodies shorter than this are not worth parsing
pub const MIN_CONTENT_CHARS: usize = 50;
pub const MAX_MAIN_CONTENT_CHARS: usize = 5000;
pub const MAX_EXTRA_PAGES: usize = 2;
pub const MAX_EXTRA_PAGE_CONTENT_CHARS: usize = 1000;

const ABOUT_SELECTORS: &[&str] = &[
    "#about",
    ".about",
    "#aboutus",
    ".aboutus",
    "[id*='about']",
    "[class*='about']",
];
const MISSION_SELECTORS: &[&str] = &["#mission", ".mission", "[id*='mission']", "[class*='mission']"];
const RELATED_LINK_KEYWORDS: &[&str] = &["about", "mission", "contact", "team", "company"];

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid URL format")]
    InvalidUrl { url: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Fetched HTML is empty or too short")]
    EmptyContent { length: usize },

    #[error("failed to parse HTML: {0}")]
    Parse(String),
}

/// Scrape `url` and up to two related same-origin pages.
pub async fn scrape_page(
    url: &str,
    fetcher: &dyn BasePageFetcher,
) -> Result<ScrapedPage, ScrapeError> {
    if !SITE_URL_REGEX.is_match(url) {
        return Err(ScrapeError::InvalidUrl {
            url: url.to_string(),
        });
    }
    let source = Url::parse(url).map_err(|_| ScrapeError::InvalidUrl {
        url: url.to_string(),
    })?;

    info!(url = %url, "Scraping website");
    let page = fetcher.fetch(url).await?;

    // Checked before the status so error pages with no body read as empty
    let length = page.body.chars().count();
    if length < MIN_CONTENT_CHARS {
        warn!(url = %url, length, "HTML too short or empty");
        return Err(ScrapeError::EmptyContent { length });
    }
    if !page.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: page.status,
        }
        .into());
    }
    if page.body.contains('\0') {
        return Err(ScrapeError::Parse("response body is binary".into()));
    }

    let mut scraped = parse_landing_page(url, &page.body, &source);
    scraped.extra_pages = expand_related_pages(&source, &scraped.page_links, fetcher).await;

    info!(
        url = %url,
        headings = scraped.headings.len(),
        links = scraped.page_links.len(),
        extra_pages = scraped.extra_pages.len(),
        "Website scraped"
    );
    Ok(scraped)
}

/// Everything that can be read from the landing page itself.
pub fn parse_landing_page(url: &str, html: &str, source: &Url) -> ScrapedPage {
    let document = Html::parse_document(html);

    ScrapedPage {
        title: first_text(&document, "title"),
        description: meta_content(&document, r#"meta[name="description"]"#).unwrap_or_default(),
        headings: non_empty_texts(&document, "h1, h2"),
        products: non_empty_texts(&document, ".product, .product-name"),
        url: url.to_string(),
        about_us: find_section(&document, ABOUT_SELECTORS, "about"),
        mission: find_section(&document, MISSION_SELECTORS, "mission"),
        page_links: related_links(&document, source),
        extra_pages: IndexMap::new(),
        main_content: truncate_chars(&main_content(&document), MAX_MAIN_CONTENT_CHARS),
    }
}

fn non_empty_texts(document: &Html, css: &str) -> Vec<String> {
    select_all(document, css)
        .into_iter()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Text of the first selector that matches anything. When that yields
/// nothing, the sibling after the first heading mentioning `keyword`.
fn find_section(document: &Html, selectors: &[&str], keyword: &str) -> String {
    let from_selector = selectors
        .iter()
        .find_map(|css| select_first(document, css))
        .map(visible_text)
        .unwrap_or_default();
    if !from_selector.is_empty() {
        return from_selector;
    }

    select_all(document, "h1, h2, h3, h4")
        .into_iter()
        .find(|heading| element_text(*heading).to_lowercase().contains(keyword))
        .and_then(|heading| heading.next_siblings().find_map(ElementRef::wrap))
        .map(visible_text)
        .unwrap_or_default()
}

fn related_links(document: &Html, source: &Url) -> Vec<PageLink> {
    select_all(document, "a[href]")
        .into_iter()
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim();
            let text = element_text(anchor).to_lowercase();
            let relevant = RELATED_LINK_KEYWORDS.iter().any(|k| text.contains(k));
            (relevant && is_same_origin(href, source)).then(|| PageLink {
                text,
                href: href.to_string(),
            })
        })
        .collect()
}

/// Relative paths and absolute URLs on the scraped site's origin.
/// Fragment-only links point back at the page itself.
fn is_same_origin(href: &str, source: &Url) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    match source.join(href) {
        Ok(target) => target.origin() == source.origin(),
        Err(_) => false,
    }
}

fn main_content(document: &Html) -> String {
    ["main", "article", "body"]
        .iter()
        .find_map(|css| select_first(document, css))
        .map(visible_text)
        .unwrap_or_default()
}

async fn expand_related_pages(
    source: &Url,
    links: &[PageLink],
    fetcher: &dyn BasePageFetcher,
) -> IndexMap<String, ExtraPage> {
    let fetches = links.iter().take(MAX_EXTRA_PAGES).map(|link| async move {
        let page = fetch_extra_page(source, &link.href, fetcher).await;
        (link.text.clone(), page)
    });

    join_all(fetches).await.into_iter().collect()
}

async fn fetch_extra_page(source: &Url, href: &str, fetcher: &dyn BasePageFetcher) -> ExtraPage {
    let Ok(target) = source.join(href) else {
        return ExtraPage::failed();
    };

    match fetcher.fetch(target.as_str()).await {
        Ok(page) if page.is_success() => {
            debug!(url = %target, "Fetched related page");
            summarize_extra_page(&page.body)
        }
        Ok(page) => {
            warn!(url = %target, status = page.status, "Related page returned error status");
            ExtraPage::failed()
        }
        Err(e) => {
            warn!(url = %target, error = %e, "Related page fetch failed");
            ExtraPage::failed()
        }
    }
}

fn summarize_extra_page(html: &str) -> ExtraPage {
    let document = Html::parse_document(html);
    let content = select_first(&document, "body")
        .map(visible_text)
        .unwrap_or_default();

    ExtraPage::Content {
        title: first_text(&document, "title"),
        headings: non_empty_texts(&document, "h1, h2, h3, h4"),
        content: truncate_chars(&content, MAX_EXTRA_PAGE_CONTENT_CHARS),
    }
}
