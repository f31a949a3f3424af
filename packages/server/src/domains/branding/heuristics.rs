//! Deterministic DOM/CSS fallbacks for every brand attribute.
//!
//! Each function looks at the parsed page only; none of them know whether the
//! enrichment pass produced anything. The extractor decides when to call them.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};

use super::models::MAX_BRAND_COLORS;
use crate::common::{first_text, meta_content, push_unique, select_all, select_first};

lazy_static! {
    static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})").expect("hex color regex is valid");
    static ref FONT_SERVICE_FAMILY_REGEX: Regex =
        Regex::new(r"family=([^&:]+)").expect("font family regex is valid");
    static ref INLINE_FONT_FAMILY_REGEX: Regex =
        Regex::new(r"(?i)font-family:\s*([^;]+)").expect("inline font regex is valid");
    static ref BLOCK_FONT_FAMILY_REGEX: Regex =
        Regex::new(r"(?i)font-family:\s*([^;}{]+)").expect("block font regex is valid");
}

const FONT_SERVICE_HOST: &str = "fonts.googleapis.com";

/// Text of every `<style>` block, in document order.
fn style_blocks(document: &Html) -> Vec<String> {
    select_all(document, "style")
        .into_iter()
        .map(|el| el.text().collect::<String>())
        .collect()
}

/// Hex color literals from inline style blocks: deduplicated, first-seen
/// order, at most five.
pub fn extract_colors(document: &Html) -> Vec<String> {
    let css = style_blocks(document).join("\n");

    let mut colors = Vec::new();
    for found in HEX_COLOR_REGEX.find_iter(&css) {
        push_unique(&mut colors, found.as_str());
        if colors.len() == MAX_BRAND_COLORS {
            break;
        }
    }
    colors
}

/// Font families from font-service stylesheet links, inline `style`
/// attributes and `<style>` blocks, in that order.
pub fn extract_fonts(document: &Html) -> Vec<String> {
    let mut fonts = Vec::new();

    for link in select_all(document, r#"link[rel="stylesheet"]"#) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains(FONT_SERVICE_HOST) {
            continue;
        }
        for captures in FONT_SERVICE_FAMILY_REGEX.captures_iter(href) {
            // Legacy URLs pack several families into one parameter: Roboto|Open+Sans
            for family in captures[1].split('|') {
                let spaced = family.replace('+', " ");
                let decoded = urlencoding::decode(&spaced)
                    .map(|d| d.into_owned())
                    .unwrap_or(spaced);
                add_font_names(&mut fonts, &decoded);
            }
        }
    }

    for element in select_all(document, "[style]") {
        let Some(style) = element.value().attr("style") else {
            continue;
        };
        if let Some(captures) = INLINE_FONT_FAMILY_REGEX.captures(style) {
            add_font_names(&mut fonts, &captures[1]);
        }
    }

    for css in style_blocks(document) {
        for captures in BLOCK_FONT_FAMILY_REGEX.captures_iter(&css) {
            add_font_names(&mut fonts, &captures[1]);
        }
    }

    fonts
}

/// Split a `font-family` value on commas and keep the cleaned names.
fn add_font_names(fonts: &mut Vec<String>, declaration: &str) {
    for name in declaration.split(',') {
        let clean = name.replace(['\'', '"'], "");
        let clean = clean.trim();
        if !clean.is_empty() {
            push_unique(fonts, clean);
        }
    }
}

fn attr_contains_ci(element: &ElementRef<'_>, attr: &str, needle: &str) -> bool {
    element
        .value()
        .attr(attr)
        .map(|v| v.to_lowercase().contains(needle))
        .unwrap_or(false)
}

fn non_empty_src(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .attr("src")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Logo `src` by fixed priority: alt mentions "logo", src mentions "logo",
/// `.logo img`, `#logo img`, first image in a `<header>`. Only the first
/// element of each rule is considered.
pub fn extract_logo(document: &Html) -> Option<String> {
    let images = select_all(document, "img");

    let candidates = [
        images
            .iter()
            .find(|img| attr_contains_ci(img, "alt", "logo"))
            .copied(),
        images
            .iter()
            .find(|img| attr_contains_ci(img, "src", "logo"))
            .copied(),
        select_first(document, ".logo img"),
        select_first(document, "#logo img"),
        select_first(document, "header img"),
    ];

    candidates.into_iter().flatten().find_map(non_empty_src)
}

/// Every image `src` on the page that does not look like a logo.
pub fn extract_product_images(document: &Html) -> Vec<String> {
    select_all(document, "img")
        .into_iter()
        .filter_map(non_empty_src)
        .filter(|src| !src.to_lowercase().contains("logo"))
        .collect()
}

/// Site name: Open Graph site name, application name, `<title>`, first `<h1>`.
pub fn extract_title(document: &Html) -> String {
    meta_content(document, r#"meta[property="og:site_name"]"#)
        .or_else(|| meta_content(document, r#"meta[name="application-name"]"#))
        .or_else(|| Some(first_text(document, "title")).filter(|t| !t.is_empty()))
        .or_else(|| Some(first_text(document, "h1")).filter(|t| !t.is_empty()))
        .unwrap_or_default()
}

/// Meta description, then Open Graph description.
pub fn extract_description(document: &Html) -> String {
    meta_content(document, r#"meta[name="description"]"#)
        .or_else(|| meta_content(document, r#"meta[property="og:description"]"#))
        .unwrap_or_default()
}
