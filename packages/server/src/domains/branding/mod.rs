//! Branding domain - turns a company website into a brand profile
//!
//! Pipeline: fetch page → advisory LLM enrichment → deterministic fallbacks
//! for every field the model left empty.

pub mod enrichment;
pub mod extractor;
pub mod heuristics;
pub mod models;

pub use enrichment::{AiBrandEnricher, BrandEnricher, NoopBrandEnricher};
pub use extractor::{extract_brand, BrandError};
pub use models::{BrandProfile, PartialBrandProfile, MAX_BRAND_COLORS};
