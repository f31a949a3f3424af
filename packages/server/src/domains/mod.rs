// Business domains. Each exposes plain async/sync functions over kernel traits;
// HTTP concerns stay in server/.

pub mod auth;
pub mod branding;
pub mod decks;
pub mod scraping;
