//! reqwest-backed page fetcher
//!
//! - Browser-like headers (many marketing sites reject obvious bots)
//! - One client-wide timeout covering connect, headers and body
//! - Dropping the returned future cancels the request

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{BasePageFetcher, FetchedPage};
use crate::common::FetchError;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    fn map_error(url: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            warn!(url = %url, "Fetch timed out");
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            warn!(url = %url, error = %error, "Fetch failed");
            FetchError::Request {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl BasePageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedPage, FetchError> {
        let parsed = Url::parse(url)
            .ok()
            .filter(|u| u.scheme() == "http" || u.scheme() == "https")
            .ok_or_else(|| FetchError::InvalidUrl {
                url: url.to_string(),
            })?;

        debug!(url = %url, "Fetching page");
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| Self::map_error(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::map_error(url, e))?;

        debug!(url = %url, status, bytes = body.len(), "Fetched page");

        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
        })
    }
}
