use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Recorded in place of an extra page that could not be fetched or read
pub const EXTRA_PAGE_FAILURE: &str = "Failed to fetch or parse";

/// A same-origin link whose text suggests company information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Lowercased, trimmed link text
    pub text: String,
    /// `href` exactly as written in the page
    pub href: String,
}

/// Shallow summary of a page reached one hop from the scraped page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraPage {
    Failed {
        error: String,
    },
    Content {
        #[serde(default)]
        title: String,
        #[serde(default)]
        headings: Vec<String>,
        #[serde(default)]
        content: String,
    },
}

impl ExtraPage {
    pub fn failed() -> Self {
        ExtraPage::Failed {
            error: EXTRA_PAGE_FAILURE.to_string(),
        }
    }

    /// Body text, empty for failed entries.
    pub fn content(&self) -> &str {
        match self {
            ExtraPage::Content { content, .. } => content,
            ExtraPage::Failed { .. } => "",
        }
    }
}

/// Everything the scraper learned about a site.
///
/// Extra pages are never expanded further.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapedPage {
    pub title: String,
    pub description: String,
    /// `<h1>`/`<h2>` text in document order
    pub headings: Vec<String>,
    /// Text of `.product` / `.product-name` elements
    pub products: Vec<String>,
    pub url: String,
    pub about_us: String,
    pub mission: String,
    pub page_links: Vec<PageLink>,
    /// Keyed by link text
    pub extra_pages: IndexMap<String, ExtraPage>,
    /// Main region text, at most 5000 characters
    pub main_content: String,
}
