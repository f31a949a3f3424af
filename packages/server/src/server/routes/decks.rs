use axum::{
    extract::rejection::JsonRejection,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domains::decks::{assemble, DeckOutput, DeckPayload};
use crate::server::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudExportResponse {
    pub message: &'static str,
    pub download_type: &'static str,
}

/// POST /generate-presentation
///
/// Rendering happens on the blocking pool; the whole file is built before
/// any response bytes go out.
pub async fn generate_presentation_handler(
    body: Result<Json<DeckPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = body?;

    let output = tokio::task::spawn_blocking(move || assemble(&payload))
        .await
        .map_err(|e| ApiError::internal("Failed to generate file").with_details(e.to_string()))??;

    let response = match output {
        DeckOutput::File {
            bytes,
            content_type,
            filename,
        } => (
            StatusCode::OK,
            [
                (CONTENT_TYPE, content_type.to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename={}", filename),
                ),
            ],
            bytes,
        )
            .into_response(),
        DeckOutput::CloudHint {
            message,
            download_type,
        } => Json(CloudExportResponse {
            message,
            download_type,
        })
        .into_response(),
    };
    Ok(response)
}
