// Deckforge - API Core
//
// Turns a company website into brand data and renders business decks
// (PPTX/PDF/DOCX) from client-assembled payloads. Infrastructure lives in
// kernel/, business logic per domain in domains/, HTTP glue in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
