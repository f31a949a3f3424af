//! Thin helpers over `scraper` used by both extraction paths.
//!
//! Invalid selectors match nothing instead of failing, so heuristic chains
//! can move on to their next candidate.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text never reaches a reader.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// All elements matching `css`, in document order.
pub fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// First element matching `css`.
pub fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

/// Concatenated text of an element, trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text a visitor would see: skips script/style content.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| HIDDEN_TAGS.contains(&a.value().name()));
        if !hidden {
            out.push_str(text);
        }
    }
    out.trim().to_string()
}

/// Trimmed text of the first match, or empty.
pub fn first_text(document: &Html, css: &str) -> String {
    select_first(document, css)
        .map(element_text)
        .unwrap_or_default()
}

/// Non-empty `content` attribute of the first matching `<meta>`.
pub fn meta_content(document: &Html, css: &str) -> Option<String> {
    select_first(document, css)
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Rewrite a root-relative (`/img/a.png`) or scheme-relative (`//cdn/a.png`)
/// reference against the page it was found on. Anything else is returned as is.
pub fn absolutize(src: &str, page_url: &Url) -> String {
    if src.starts_with("//") {
        format!("{}:{}", page_url.scheme(), src)
    } else if src.starts_with('/') {
        format!("{}{}", page_url.origin().ascii_serialization(), src)
    } else {
        src.to_string()
    }
}
