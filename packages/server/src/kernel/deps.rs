//! Server dependencies for handlers (using traits for testability)
//!
//! This module provides the central dependency container used by all routes.
//! All external services use trait abstractions to enable testing.

use anyhow::{Context, Result};
use llm_client::LlmClient;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::domains::auth::{
    GoogleOAuthClient, JwtService, MemoryUserStore, PostgresUserStore, UserStore,
};
use crate::domains::branding::{AiBrandEnricher, BrandEnricher, NoopBrandEnricher};
use crate::kernel::{BasePageFetcher, HttpFetcher, LlmAI};

/// Server dependencies accessible to routes (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    /// Outbound page fetcher shared by brand extraction and scraping
    pub fetcher: Arc<dyn BasePageFetcher>,
    pub brand_enricher: Arc<dyn BrandEnricher>,
    pub user_store: Arc<dyn UserStore>,
    /// JWT service for token creation
    pub jwt_service: Arc<JwtService>,
    /// Google sign-in; `None` when client credentials are not configured
    pub google_oauth: Option<Arc<GoogleOAuthClient>>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        fetcher: Arc<dyn BasePageFetcher>,
        brand_enricher: Arc<dyn BrandEnricher>,
        user_store: Arc<dyn UserStore>,
        jwt_service: Arc<JwtService>,
        google_oauth: Option<Arc<GoogleOAuthClient>>,
    ) -> Self {
        Self {
            fetcher,
            brand_enricher,
            user_store,
            jwt_service,
            google_oauth,
        }
    }

    /// Wire production implementations from configuration.
    ///
    /// Connects to Postgres and runs migrations when a database URL is set.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let fetcher: Arc<dyn BasePageFetcher> = Arc::new(HttpFetcher::new(config.fetch_timeout)?);

        let brand_enricher: Arc<dyn BrandEnricher> = match &config.llm_api_key {
            Some(key) => {
                let http_client = reqwest::Client::builder()
                    .timeout(config.llm_timeout)
                    .build()
                    .context("Failed to build LLM HTTP client")?;
                let client = LlmClient::new(key.clone())
                    .with_base_url(&config.llm_base_url)
                    .with_http_client(http_client);
                info!(
                    model = %config.llm_model,
                    timeout = ?config.llm_timeout,
                    "LLM brand enrichment enabled"
                );
                Arc::new(
                    AiBrandEnricher::new(Arc::new(LlmAI::new(client, config.llm_model.clone())))
                        .with_timeout(config.llm_timeout),
                )
            }
            None => {
                warn!("No LLM API key configured, brand extraction uses page heuristics only");
                Arc::new(NoopBrandEnricher)
            }
        };

        let user_store: Arc<dyn UserStore> = match &config.database_url {
            Some(url) => {
                info!("Connecting to database...");
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("Failed to connect to database")?;

                info!("Running database migrations...");
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run migrations")?;
                info!("Migrations complete");

                Arc::new(PostgresUserStore::new(pool))
            }
            None => {
                warn!("DATABASE_URL not set, users are kept in memory and lost on restart");
                Arc::new(MemoryUserStore::new())
            }
        };

        let google_oauth = match (&config.google_client_id, &config.google_client_secret) {
            (Some(id), Some(secret)) => {
                let http_client = reqwest::Client::builder()
                    .timeout(config.fetch_timeout)
                    .build()
                    .context("Failed to build OAuth HTTP client")?;
                Some(Arc::new(
                    GoogleOAuthClient::new(id.clone(), secret.clone(), config.google_redirect_uri())
                        .with_http_client(http_client),
                ))
            }
            _ => None,
        };

        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
        ));

        Ok(Self::new(
            fetcher,
            brand_enricher,
            user_store,
            jwt_service,
            google_oauth,
        ))
    }
}
