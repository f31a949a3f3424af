use scraper::Html;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use super::enrichment::BrandEnricher;
use super::heuristics;
use super::models::{BrandProfile, PartialBrandProfile, MAX_BRAND_COLORS};
use crate::common::{absolutize, FetchError};
use crate::kernel::BasePageFetcher;

#[derive(Debug, Error)]
pub enum BrandError {
    /// Unreachable site, non-success status or timeout
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Response body is not markup
    #[error("failed to parse page: {0}")]
    Parse(String),
}

/// Build a brand profile for `url`.
///
/// Enrichment failures are logged and absorbed; only fetch and parse
/// problems reach the caller.
pub async fn extract_brand(
    url: &str,
    fetcher: &dyn BasePageFetcher,
    enricher: &dyn BrandEnricher,
) -> Result<BrandProfile, BrandError> {
    let page_url = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
        url: url.to_string(),
    })?;

    let page = fetcher.fetch(url).await?;
    if !page.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: page.status,
        }
        .into());
    }
    ensure_markup(&page.body)?;

    let enriched = match enricher.enrich(&page.body).await {
        Ok(partial) => partial,
        Err(e) => {
            warn!(url = %url, error = %e, "Brand enrichment failed, using page heuristics");
            PartialBrandProfile::default()
        }
    };

    let profile = fill_gaps(enriched, &page.body, &page_url);
    info!(
        url = %url,
        title = %profile.title,
        colors = profile.colors.len(),
        fonts = profile.fonts.len(),
        has_logo = !profile.logo_url.is_empty(),
        "Brand extracted"
    );
    Ok(profile)
}

/// html5ever accepts any input, so reject what clearly is not a document.
fn ensure_markup(body: &str) -> Result<(), BrandError> {
    if body.trim().is_empty() {
        return Err(BrandError::Parse("empty response body".into()));
    }
    if body.contains('\0') {
        return Err(BrandError::Parse("response body is binary".into()));
    }
    Ok(())
}

/// Merge model suggestions with page heuristics: a heuristic runs only for
/// fields the model left empty.
pub fn fill_gaps(enriched: PartialBrandProfile, html: &str, page_url: &Url) -> BrandProfile {
    let document = Html::parse_document(html);

    let mut colors = if enriched.colors.is_empty() {
        heuristics::extract_colors(&document)
    } else {
        enriched.colors
    };
    colors.truncate(MAX_BRAND_COLORS);

    let fonts = if enriched.fonts.is_empty() {
        heuristics::extract_fonts(&document)
    } else {
        enriched.fonts
    };

    let logo_url = enriched
        .logo
        .or_else(|| heuristics::extract_logo(&document))
        .map(|src| absolutize(&src, page_url))
        .unwrap_or_default();

    let product_images = if enriched.product_images.is_empty() {
        heuristics::extract_product_images(&document)
    } else {
        enriched.product_images
    };

    BrandProfile {
        title: enriched
            .title
            .unwrap_or_else(|| heuristics::extract_title(&document)),
        description: enriched
            .description
            .unwrap_or_else(|| heuristics::extract_description(&document)),
        colors,
        fonts,
        logo_url,
        product_image_urls: product_images
            .iter()
            .map(|src| absolutize(src, page_url))
            .collect(),
    }
}
