use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::Serialize;
use tracing::info;

use super::UrlRequest;
use crate::domains::branding::{extract_brand, BrandProfile};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// Brand profile fields plus the analyzed `url`.
#[derive(Debug, Serialize)]
pub struct AnalyzeWebsiteResponse {
    #[serde(flatten)]
    pub profile: BrandProfile,
    pub url: String,
}

/// POST /analyze/website
pub async fn analyze_website_handler(
    Extension(state): Extension<AxumAppState>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<AnalyzeWebsiteResponse>, ApiError> {
    let Json(request) = body?;
    let url = request
        .url()
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    info!(url = %url, "Analyzing website");
    let profile = extract_brand(
        url,
        state.deps.fetcher.as_ref(),
        state.deps.brand_enricher.as_ref(),
    )
    .await?;

    Ok(Json(AnalyzeWebsiteResponse {
        profile,
        url: url.to_string(),
    }))
}
