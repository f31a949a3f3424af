// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "extract a brand profile") lives in domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BasePageFetcher)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::FetchError;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Complete a prompt expecting JSON response (returns raw JSON string)
    /// Parse with serde_json::from_str in calling code
    async fn complete_json(&self, prompt: &str) -> Result<String> {
        // Default implementation calls complete
        self.complete(prompt).await
    }
}

// =============================================================================
// Page Fetcher Trait (Infrastructure - outbound HTTP)
// =============================================================================

/// Raw response for a fetched page. Status is reported, not judged:
/// callers decide what a non-success status means for them.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// Fetch a page. Fails only when no response could be obtained
    /// (bad URL, connection failure, timeout).
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedPage, FetchError>;
}
