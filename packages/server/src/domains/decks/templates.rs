//! Visual templates and brand color handling.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use super::models::TemplateSelector;

lazy_static! {
    static ref RGB_FUNCTION_REGEX: Regex =
        Regex::new(r"(?i)^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$")
            .expect("rgb regex is valid");
    static ref HEX_REGEX: Regex =
        Regex::new(r"^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").expect("hex regex is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Accepts `rgb(r,g,b)`, `#RRGGBB` and `#RGB`.
    pub fn parse(value: &str) -> Option<Rgb> {
        let value = value.trim();

        if let Some(caps) = RGB_FUNCTION_REGEX.captures(value) {
            let component = |i: usize| caps[i].parse::<u8>().ok();
            return Some(Rgb(component(1)?, component(2)?, component(3)?));
        }

        let caps = HEX_REGEX.captures(value)?;
        let digits = &caps[1];
        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// `RRGGBB`, uppercase, no leading `#`
    pub fn hex_digits(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Channels scaled to 0.0..=1.0
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_digits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub background: Rgb,
    pub title_color: Rgb,
    pub body_color: Rgb,
    pub heading_font_size: u32,
    pub body_font_size: u32,
}

pub static TEMPLATES: [Template; 4] = [
    Template {
        name: "default",
        background: Rgb(0x72, 0x09, 0xB7),
        title_color: Rgb(0xFF, 0xFF, 0xFF),
        body_color: Rgb(0x36, 0x36, 0x36),
        heading_font_size: 24,
        body_font_size: 16,
    },
    Template {
        name: "modern",
        background: Rgb(0xF7, 0x25, 0x85),
        title_color: Rgb(0xFF, 0xFF, 0xFF),
        body_color: Rgb(0x22, 0x22, 0x3B),
        heading_font_size: 28,
        body_font_size: 17,
    },
    Template {
        name: "minimal",
        background: Rgb(0xFF, 0xFF, 0xFF),
        title_color: Rgb(0x22, 0x22, 0x22),
        body_color: Rgb(0x22, 0x22, 0x22),
        heading_font_size: 22,
        body_font_size: 15,
    },
    Template {
        name: "bold",
        background: Rgb(0x3A, 0x0C, 0xA3),
        title_color: Rgb(0xFF, 0xD7, 0x00),
        body_color: Rgb(0xFF, 0xFF, 0xFF),
        heading_font_size: 30,
        body_font_size: 18,
    },
];

/// Look up a template; anything unrecognized gets `default`.
pub fn resolve_template(selector: Option<&TemplateSelector>) -> &'static Template {
    let by_index = |i: i64| {
        usize::try_from(i)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| TEMPLATES.get(i))
    };

    let found = match selector {
        Some(TemplateSelector::Index(i)) => by_index(*i),
        Some(TemplateSelector::Name(name)) => {
            let name = name.trim();
            TEMPLATES
                .iter()
                .find(|t| t.name.eq_ignore_ascii_case(name))
                .or_else(|| name.parse::<i64>().ok().and_then(by_index))
        }
        None => None,
    };
    found.unwrap_or(&TEMPLATES[0])
}

/// Resolved colors and sizes every renderer draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckStyle {
    pub background: Rgb,
    pub title_color: Rgb,
    pub body_color: Rgb,
    pub heading_font_size: u32,
    pub body_font_size: u32,
}

impl DeckStyle {
    /// Template colors with the first brand color as background. A brand
    /// color that cannot be read leaves the template background in place.
    pub fn resolve(selector: Option<&TemplateSelector>, brand_colors: &[String]) -> Self {
        let template = resolve_template(selector);
        let background = brand_colors
            .first()
            .and_then(|c| Rgb::parse(c))
            .unwrap_or(template.background);

        Self {
            background,
            title_color: template.title_color,
            body_color: template.body_color,
            heading_font_size: template.heading_font_size,
            body_font_size: template.body_font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_function_converts_to_hex() {
        assert_eq!(Rgb::parse("rgb(10,20,30)").unwrap().to_string(), "#0A141E");
        assert_eq!(Rgb::parse(" rgb(255, 0, 128) ").unwrap().to_string(), "#FF0080");
        assert_eq!(Rgb::parse("rgb(256,0,0)"), None);
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(Rgb::parse("#abcdef").unwrap().to_string(), "#ABCDEF");
        assert_eq!(Rgb::parse("#fa0").unwrap().to_string(), "#FFAA00");
        assert_eq!(Rgb::parse("not-a-color"), None);
        assert_eq!(Rgb::parse("#12345"), None);
    }

    #[test]
    fn test_template_selection() {
        assert_eq!(resolve_template(None).name, "default");
        assert_eq!(
            resolve_template(Some(&TemplateSelector::Name("Modern".into()))).name,
            "modern"
        );
        assert_eq!(resolve_template(Some(&TemplateSelector::Index(4))).name, "bold");
        assert_eq!(
            resolve_template(Some(&TemplateSelector::Name("3".into()))).name,
            "minimal"
        );
        assert_eq!(resolve_template(Some(&TemplateSelector::Index(0))).name, "default");
        assert_eq!(resolve_template(Some(&TemplateSelector::Index(9))).name, "default");
        assert_eq!(
            resolve_template(Some(&TemplateSelector::Name("neon".into()))).name,
            "default"
        );
    }

    #[test]
    fn test_brand_color_overrides_background_only() {
        let style = DeckStyle::resolve(
            Some(&TemplateSelector::Name("bold".into())),
            &["rgb(10,20,30)".to_string(), "#FFFFFF".to_string()],
        );
        assert_eq!(style.background.to_string(), "#0A141E");
        assert_eq!(style.title_color.to_string(), "#FFD700");
        assert_eq!(style.heading_font_size, 30);
    }

    #[test]
    fn test_invalid_brand_color_keeps_template_background() {
        let style = DeckStyle::resolve(None, &["not-a-color".to_string()]);
        assert_eq!(style.background.to_string(), "#7209B7");

        let style = DeckStyle::resolve(
            Some(&TemplateSelector::Name("modern".into())),
            &["not-a-color".to_string()],
        );
        assert_eq!(style.background.to_string(), "#F72585");
    }
}
