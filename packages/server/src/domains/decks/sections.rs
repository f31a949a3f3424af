//! Format-independent deck outline. Every renderer walks the same list, so
//! section order is decided once, here.

use super::models::{present, DeckPayload};

pub const DEFAULT_DECK_TITLE: &str = "Business Deck";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Newline separated; renderers emit one paragraph or text line per line
    pub body: String,
}

impl Section {
    fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body.split('\n').map(|line| line.trim_end_matches('\r'))
    }
}

/// Title, About Us, Mission, Website Headings, Products, Main Website
/// Content, Brand Colors, then one section per extra page. Empty parts are
/// skipped; the title section is always present.
pub fn build_sections(payload: &DeckPayload) -> Vec<Section> {
    let mut sections = vec![Section::new(
        present(&payload.company_name).unwrap_or(DEFAULT_DECK_TITLE),
        "",
    )];

    if let Some(about) = present(&payload.about_us).or_else(|| present(&payload.description)) {
        sections.push(Section::new("About Us", about));
    }
    if let Some(mission) = present(&payload.mission) {
        sections.push(Section::new("Mission", mission));
    }
    if !payload.headings.is_empty() {
        sections.push(Section::new("Website Headings", payload.headings.join("\n")));
    }

    let products: Vec<String> = payload.products.iter().filter_map(|p| p.line()).collect();
    if !products.is_empty() {
        sections.push(Section::new("Products", products.join("\n")));
    }

    if let Some(content) = present(&payload.main_content) {
        sections.push(Section::new("Main Website Content", content));
    }
    if !payload.brand_colors.is_empty() {
        sections.push(Section::new("Brand Colors", payload.brand_colors.join("\n")));
    }

    let scraped_pages = payload
        .website_data
        .iter()
        .flat_map(|data| data.extra_pages.iter());
    let mut seen: Vec<&str> = Vec::new();
    for (name, page) in payload.extra_pages.iter().chain(scraped_pages) {
        if seen.contains(&name.as_str()) {
            continue;
        }
        seen.push(name);
        sections.push(Section::new(name.clone(), page.content()));
    }

    sections
}
