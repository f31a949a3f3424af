// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BaseAI, BasePageFetcher, FetchedPage, ServerDeps};
use crate::common::FetchError;
use crate::domains::auth::{GoogleOAuthClient, JwtService, MemoryUserStore, UserStore};
use crate::domains::branding::{AiBrandEnricher, BrandEnricher, NoopBrandEnricher};

pub const TEST_JWT_SECRET: &str = "test_secret";
pub const TEST_JWT_ISSUER: &str = "test_issuer";

// =============================================================================
// Mock Page Fetcher
// =============================================================================

enum MockPage {
    Page { status: u16, body: String },
    Failure,
}

/// Serves canned pages by exact URL. Unknown URLs fail like an unreachable host.
pub struct MockPageFetcher {
    pages: Arc<Mutex<HashMap<String, MockPage>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve `body` with status 200
    pub fn with_page(self, url: &str, body: impl Into<String>) -> Self {
        self.with_status(url, 200, body)
    }

    pub fn with_status(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.pages.lock().unwrap().insert(
            url.to_string(),
            MockPage::Page {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Make `url` fail as if the connection was refused
    pub fn with_failure(self, url: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), MockPage::Failure);
        self
    }

    /// Get all URLs that were fetched
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_fetched(&self, url: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|u| u == url)
    }
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedPage, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        match self.pages.lock().unwrap().get(url) {
            Some(MockPage::Page { status, body }) => Ok(FetchedPage {
                url: url.to_string(),
                status: *status,
                body: body.clone(),
            }),
            Some(MockPage::Failure) | None => Err(FetchError::Request {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

pub struct MockAI {
    responses: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
    failing: bool,
    hanging: bool,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: false,
            hanging: false,
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.responses.lock().unwrap().push(json);
        self
    }

    /// Every call fails, as when the provider is down
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Calls never complete, as when the provider stalls
    pub fn hanging(mut self) -> Self {
        self.hanging = true;
        self
    }

    /// Get all prompts that were sent to the AI
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the last prompt sent to the AI
    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Check if a prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.contains(text))
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        // Record the call
        self.calls.lock().unwrap().push(prompt.to_string());

        if self.failing {
            anyhow::bail!("mock AI failure");
        }
        if self.hanging {
            std::future::pending::<()>().await;
        }

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            Ok(responses.remove(0))
        } else {
            // Return default mock response
            Ok("Mock AI response".to_string())
        }
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub fetcher: Arc<dyn BasePageFetcher>,
    /// `None` runs brand extraction on heuristics alone
    pub ai: Option<Arc<MockAI>>,
    pub user_store: Arc<MemoryUserStore>,
    pub google_oauth: Option<Arc<GoogleOAuthClient>>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            fetcher: Arc::new(MockPageFetcher::new()),
            ai: None,
            user_store: Arc::new(MemoryUserStore::new()),
            google_oauth: None,
        }
    }

    /// Set a mock page fetcher
    pub fn mock_fetcher(self, fetcher: MockPageFetcher) -> Self {
        self.with_fetcher(Arc::new(fetcher))
    }

    /// Use any fetcher, e.g. a real `HttpFetcher` against a wiremock server
    pub fn with_fetcher(mut self, fetcher: Arc<dyn BasePageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Set a mock AI (enables enrichment)
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Some(Arc::new(ai));
        self
    }

    pub fn with_oauth(mut self, oauth: GoogleOAuthClient) -> Self {
        self.google_oauth = Some(Arc::new(oauth));
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_server_deps(self) -> ServerDeps {
        let brand_enricher: Arc<dyn BrandEnricher> = match self.ai {
            Some(ai) => Arc::new(AiBrandEnricher::new(ai)),
            None => Arc::new(NoopBrandEnricher),
        };
        let user_store: Arc<dyn UserStore> = self.user_store;

        ServerDeps::new(
            self.fetcher,
            brand_enricher,
            user_store,
            Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())),
            self.google_oauth,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
