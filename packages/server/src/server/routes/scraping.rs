use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use tracing::info;

use super::UrlRequest;
use crate::domains::scraping::{scrape_page, ScrapedPage};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// POST /scrape-website
pub async fn scrape_website_handler(
    Extension(state): Extension<AxumAppState>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<ScrapedPage>, ApiError> {
    let Json(request) = body?;
    let url = request
        .url()
        .ok_or_else(|| ApiError::bad_request("Missing URL"))?;

    info!(url = %url, "Scraping website");
    let page = scrape_page(url, state.deps.fetcher.as_ref()).await?;
    Ok(Json(page))
}
