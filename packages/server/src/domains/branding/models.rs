use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::push_unique;

/// Cap on brand colors reported for a site
pub const MAX_BRAND_COLORS: usize = 5;

lazy_static! {
    static ref HEX_COLOR_LITERAL: Regex =
        Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("hex literal regex is valid");
}

/// Visual and textual brand attributes of a website.
///
/// Built fresh for every extraction request and owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    pub title: String,
    pub description: String,
    /// Hex color literals, unique, in discovery order, at most [`MAX_BRAND_COLORS`]
    pub colors: Vec<String>,
    /// Font family names, unique, in discovery order
    pub fonts: Vec<String>,
    /// Absolute URL of the logo image, or empty
    #[serde(rename = "logo")]
    pub logo_url: String,
    #[serde(rename = "productImages")]
    pub product_image_urls: Vec<String>,
}

/// Advisory output of the enrichment pass. Anything missing, blank or of the
/// wrong JSON type is simply absent here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialBrandProfile {
    pub title: Option<String>,
    pub description: Option<String>,
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
    pub logo: Option<String>,
    pub product_images: Vec<String>,
}

impl PartialBrandProfile {
    /// Lenient field-by-field read of a model response object.
    pub fn from_json(value: &Value) -> Self {
        Self {
            title: string_field(value, "title"),
            description: string_field(value, "description"),
            colors: hex_color_field(value, "colors"),
            fonts: string_list_field(value, "fonts"),
            logo: string_field(value, "logo"),
            product_images: string_list_field(value, "productImages"),
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list_field(value: &Value, key: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(items) = value.get(key).and_then(Value::as_array) {
        for item in items.iter().filter_map(Value::as_str) {
            let item = item.trim();
            if !item.is_empty() {
                push_unique(&mut out, item);
            }
        }
    }
    out
}

/// Model colors in the same shape the page heuristics produce: hex literals
/// only, unique, capped.
fn hex_color_field(value: &Value, key: &str) -> Vec<String> {
    let mut colors = string_list_field(value, key);
    colors.retain(|c| HEX_COLOR_LITERAL.is_match(c));
    colors.truncate(MAX_BRAND_COLORS);
    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_profile_ignores_wrong_types() {
        let partial = PartialBrandProfile::from_json(&json!({
            "title": 42,
            "description": "  ",
            "colors": "#fff",
            "fonts": ["Inter", 3, "Inter", " Roboto "],
            "logo": "https://acme.test/logo.svg",
            "productImages": null
        }));

        assert_eq!(partial.title, None);
        assert_eq!(partial.description, None);
        assert!(partial.colors.is_empty());
        assert_eq!(partial.fonts, vec!["Inter", "Roboto"]);
        assert_eq!(partial.logo.as_deref(), Some("https://acme.test/logo.svg"));
        assert!(partial.product_images.is_empty());
    }

    #[test]
    fn test_partial_profile_keeps_only_hex_colors() {
        let partial = PartialBrandProfile::from_json(&json!({
            "colors": ["Navy", "rgb(1,2,3)", " #0a141e ", "#FFF", "#FFF", "#12345", "#abcdefg"]
        }));
        assert_eq!(partial.colors, vec!["#0a141e", "#FFF"]);

        let partial = PartialBrandProfile::from_json(&json!({
            "colors": ["#111", "#222", "#333", "#444", "#555", "#666"]
        }));
        assert_eq!(partial.colors.len(), MAX_BRAND_COLORS);
    }

    #[test]
    fn test_brand_profile_wire_names() {
        let profile = BrandProfile {
            logo_url: "https://acme.test/l.png".into(),
            product_image_urls: vec!["https://acme.test/p.png".into()],
            ..Default::default()
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["logo"], "https://acme.test/l.png");
        assert_eq!(value["productImages"][0], "https://acme.test/p.png");
    }
}
