//! Minimal client for OpenAI-compatible chat completion APIs.
//!
//! Talks to any provider exposing `POST {base_url}/chat/completions` with the
//! OpenAI wire format. The default base URL is Gemini's OpenAI-compatible
//! endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_client::{ChatRequest, LlmClient, Message};
//!
//! let client = LlmClient::new(api_key);
//!
//! let response = client
//!     .chat_completion(ChatRequest::new("gemini-2.0-flash").message(Message::user("Hello!")))
//!     .await?;
//!
//! let json = client.json_completion("gemini-2.0-flash", "Return {\"ok\": true}").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{LlmError, Result};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

/// Gemini's OpenAI-compatible REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Chat completion client.
#[derive(Clone)]
pub struct LlmClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from the `LLM_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| LlmError::Config("LLM_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (OpenAI, proxies, local servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "LLM request failed");
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "LLM API error");
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Api("No content in response".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "LLM chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: raw.usage,
        })
    }

    /// Single-prompt completion constrained to a JSON object.
    ///
    /// Returns the raw text with any surrounding code fence removed; callers
    /// deserialize it themselves.
    pub async fn json_completion(&self, model: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(model)
            .message(Message::user(prompt))
            .temperature(0.0)
            .json_object();

        let response = self.chat_completion(request).await?;
        Ok(strip_code_blocks(&response.content).to_string())
    }
}
