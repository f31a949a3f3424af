// HTTP routes
pub mod auth;
pub mod branding;
pub mod decks;
pub mod health;
pub mod scraping;

pub use auth::*;
pub use branding::*;
pub use decks::*;
pub use health::*;
pub use scraping::*;

use serde::Deserialize;

/// `{url}` body shared by the website endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl UrlRequest {
    /// Trimmed URL, if one was sent.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}
