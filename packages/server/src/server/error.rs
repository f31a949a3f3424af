//! JSON error responses for every route.
//!
//! Domain errors are mapped here once so handlers can just use `?`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::domains::auth::{AuthError, StoreError};
use crate::domains::branding::BrandError;
use crate::domains::decks::DeckError;
use crate::domains::scraping::ScrapeError;

/// Serialized as `{error, details?}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.error,
            details: self.details.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("Invalid request body").with_details(rejection.body_text())
    }
}

impl From<BrandError> for ApiError {
    fn from(e: BrandError) -> Self {
        match e {
            BrandError::Fetch(fetch) => {
                warn!(url = %fetch.url(), error = %fetch, "Website fetch failed");
                ApiError::bad_request("Failed to fetch website").with_details(fetch.to_string())
            }
            BrandError::Parse(message) => {
                error!(error = %message, "Website analysis failed");
                ApiError::internal("Failed to analyze website").with_details(message)
            }
        }
    }
}

impl From<ScrapeError> for ApiError {
    fn from(e: ScrapeError) -> Self {
        match e {
            ScrapeError::InvalidUrl { .. } => {
                ApiError::bad_request("Invalid URL format").with_details(e.to_string())
            }
            ScrapeError::Fetch(fetch) => {
                warn!(url = %fetch.url(), error = %fetch, "Scrape fetch failed");
                ApiError::internal("Failed to fetch URL").with_details(fetch.to_string())
            }
            ScrapeError::EmptyContent { length } => {
                warn!(length, "Scraped page too short");
                ApiError::internal("Fetched HTML is empty or too short")
                    .with_details("No content or invalid response from target URL.")
            }
            ScrapeError::Parse(message) => {
                error!(error = %message, "Scraped page could not be parsed");
                ApiError::internal("Failed to parse HTML").with_details(message)
            }
        }
    }
}

impl From<DeckError> for ApiError {
    fn from(e: DeckError) -> Self {
        match e {
            DeckError::Validation | DeckError::UnsupportedFormat { .. } => {
                ApiError::bad_request(e.to_string())
            }
            DeckError::Generation { format, source } => {
                error!(format = %format, error = %source, "Deck generation failed");
                ApiError::internal("Failed to generate file").with_details(format!("{:#}", source))
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match &e {
            AuthError::MissingFields | AuthError::MissingCode => ApiError::bad_request(e.to_string()),
            AuthError::AlreadyExists | AuthError::Store(StoreError::DuplicateEmail) => {
                ApiError::new(StatusCode::CONFLICT, "User already exists")
            }
            AuthError::InvalidCredentials | AuthError::Unauthorized => {
                ApiError::new(StatusCode::UNAUTHORIZED, e.to_string())
            }
            AuthError::OAuthNotConfigured => ApiError::internal(e.to_string()),
            AuthError::Provider(_) | AuthError::TokenExchange(_) | AuthError::NoEmail => {
                warn!(error = %e, "OAuth sign-in failed");
                ApiError::new(StatusCode::BAD_GATEWAY, e.to_string())
            }
            AuthError::Store(_) | AuthError::Internal(_) => {
                error!(error = %e, "Auth request failed");
                ApiError::internal("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::FetchError;
    use crate::domains::decks::ExportFormat;

    #[test]
    fn test_deck_errors_map_to_status_codes() {
        let validation = ApiError::from(DeckError::Validation);
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            validation.error,
            "Missing required data for presentation generation"
        );
        assert!(validation.details.is_none());

        let generation = ApiError::from(DeckError::Generation {
            format: ExportFormat::Pdf,
            source: anyhow::anyhow!("font table missing"),
        });
        assert_eq!(generation.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(generation.error, "Failed to generate file");
        assert_eq!(generation.details.as_deref(), Some("font table missing"));
    }

    #[test]
    fn test_scrape_errors_map_to_status_codes() {
        let invalid = ApiError::from(ScrapeError::InvalidUrl {
            url: "nope".into(),
        });
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let fetch = ApiError::from(ScrapeError::Fetch(FetchError::Timeout {
            url: "https://example.com".into(),
        }));
        assert_eq!(fetch.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fetch.error, "Failed to fetch URL");
        assert!(fetch.details.is_some());
    }

    #[test]
    fn test_brand_fetch_failure_is_client_error() {
        let err = ApiError::from(BrandError::Fetch(FetchError::Status {
            url: "https://example.com".into(),
            status: 404,
        }));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Failed to fetch website");
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        assert_eq!(
            ApiError::from(AuthError::AlreadyExists).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AuthError::Store(StoreError::DuplicateEmail)).status,
            StatusCode::CONFLICT
        );
    }
}
