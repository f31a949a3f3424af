use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Gemini model used for brand enrichment unless overridden
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Public base URL of the web client (OAuth redirects land here)
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Postgres connection string; users are kept in memory when absent
    pub database_url: Option<String>,
    /// Enrichment is skipped entirely when no key is configured
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub fetch_timeout: Duration,
    /// Upper bound on one enrichment call; slower answers are dropped
    pub llm_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            app_url: env::var("APP_URL")
                .or_else(|_| env::var("NEXT_PUBLIC_APP_URL"))
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "deckforge".to_string()),
            database_url: non_empty_var("DATABASE_URL"),
            llm_api_key: non_empty_var("LLM_API_KEY").or_else(|| non_empty_var("GEMINI_API_KEY")),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| llm_client::DEFAULT_BASE_URL.to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            google_client_id: non_empty_var("GOOGLE_CLIENT_ID"),
            google_client_secret: non_empty_var("GOOGLE_CLIENT_SECRET"),
            fetch_timeout: Duration::from_secs(
                env::var("FETCH_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            llm_timeout: Duration::from_secs(
                env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }

    /// Redirect URI registered with Google for the OAuth callback
    pub fn google_redirect_uri(&self) -> String {
        format!("{}/api/auth/google/callback", self.app_url)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
