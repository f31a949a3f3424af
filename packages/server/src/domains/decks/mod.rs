//! Deck assembly: a client payload in, a PPTX/PDF/DOCX file out.
//!
//! The payload is flattened into titled sections once; each renderer only
//! decides how a section looks in its format.

pub mod assembler;
pub mod models;
pub mod renderers;
pub mod sections;
pub mod templates;

pub use assembler::{assemble, DeckError, DeckOutput, CLOUD_EXPORT_MESSAGE};
pub use models::{DeckPayload, ExportFormat, ProductEntry, ProductRecord, TemplateSelector};
pub use sections::{build_sections, Section, DEFAULT_DECK_TITLE};
pub use templates::{resolve_template, DeckStyle, Rgb, Template, TEMPLATES};
