use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use super::assembler::DeckError;
use crate::domains::scraping::{ExtraPage, ScrapedPage};

/// Everything the client sends to build a deck. Every field is optional on
/// the wire; `null` reads the same as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckPayload {
    #[serde(alias = "projectName")]
    pub company_name: Option<String>,
    pub about_us: Option<String>,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub main_content: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub headings: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub products: Vec<ProductEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub brand_colors: Vec<String>,
    pub selected_template: Option<TemplateSelector>,
    /// Kept raw so an unknown value can be reported as such
    pub export_format: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub extra_pages: IndexMap<String, ExtraPage>,
    #[serde(alias = "scrapedWebsiteData")]
    pub website_data: Option<ScrapedPage>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Non-blank text or nothing.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl DeckPayload {
    /// True when none of the fields that give a deck its substance is set.
    pub fn lacks_content(&self) -> bool {
        present(&self.company_name).is_none()
            && present(&self.about_us).is_none()
            && present(&self.main_content).is_none()
            && present(&self.mission).is_none()
            && self.headings.is_empty()
            && self.products.is_empty()
    }

    pub fn format(&self) -> Result<ExportFormat, DeckError> {
        match self.export_format.as_deref() {
            None => Ok(ExportFormat::default()),
            Some(raw) => raw.parse(),
        }
    }
}

/// A product as either a bare name or a full record from the project builder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductEntry {
    Name(String),
    Record(ProductRecord),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "skuCode")]
    pub sku: Option<String>,
    #[serde(default, alias = "imageUrl")]
    pub image: Option<String>,
}

impl ProductEntry {
    /// `name`, `name: description`, `name (SKU x)` or both. Records without a
    /// name render nothing.
    pub fn line(&self) -> Option<String> {
        match self {
            ProductEntry::Name(name) => {
                let name = name.trim();
                (!name.is_empty()).then(|| name.to_string())
            }
            ProductEntry::Record(record) => {
                let name = record.name.trim();
                if name.is_empty() {
                    return None;
                }
                let mut line = name.to_string();
                if let Some(description) = present(&record.description) {
                    line.push_str(": ");
                    line.push_str(description);
                }
                if let Some(sku) = present(&record.sku) {
                    line.push_str(&format!(" (SKU {})", sku));
                }
                Some(line)
            }
        }
    }
}

/// Template by name (`"modern"`) or 1-based position (`2`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TemplateSelector {
    Index(i64),
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Ppt,
    Pdf,
    Docx,
    Gdoc,
    Gslides,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Ppt => "ppt",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Gdoc => "gdoc",
            ExportFormat::Gslides => "gslides",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ppt" => Ok(ExportFormat::Ppt),
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "gdoc" => Ok(ExportFormat::Gdoc),
            "gslides" => Ok(ExportFormat::Gslides),
            other => Err(DeckError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
