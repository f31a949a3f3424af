use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AxumAppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    llm_enrichment: bool,
    user_store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Reports whether brand enrichment is wired to a model and which user store
/// is in use. Returns 503 Service Unavailable when the user store does not
/// answer.
pub async fn health_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = &state.deps.user_store;
    let store_error = store.health_check().await.err().map(|e| e.to_string());

    let (status, status_code) = match store_error {
        None => ("healthy", StatusCode::OK),
        Some(_) => ("unhealthy", StatusCode::SERVICE_UNAVAILABLE),
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            llm_enrichment: state.deps.brand_enricher.is_enabled(),
            user_store: store.kind().to_string(),
            error: store_error,
        }),
    )
}
