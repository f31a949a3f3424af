//! Failures shared by every component that talks to a target website.

use thiserror::Error;

/// Errors raised while fetching a remote page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed or uses an unsupported scheme
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Request exceeded the configured timeout and was aborted
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Connection, TLS or body read failure
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Target answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidUrl { url }
            | FetchError::Timeout { url }
            | FetchError::Request { url, .. }
            | FetchError::Status { url, .. } => url,
        }
    }
}
