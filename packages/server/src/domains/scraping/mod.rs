//! Scraping domain - structured summary of a company website
//!
//! Landing page heuristics plus a one-hop look at up to two related pages
//! (about, mission, contact, team, company).

pub mod models;
pub mod extractor;

pub use extractor::{parse_landing_page, scrape_page, ScrapeError};
pub use models::{ExtraPage, PageLink, ScrapedPage, EXTRA_PAGE_FAILURE};
