// Common types and utilities shared across the application

pub mod errors;
pub mod html;
pub mod text;

pub use errors::*;
pub use html::*;
pub use text::*;
