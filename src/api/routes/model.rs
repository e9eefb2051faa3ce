//! RDF mapping file download.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::api::server::AppState;

/// GET /model — serve the configured RDF mapping file as an attachment.
pub async fn download_model(State(state): State<Arc<AppState>>) -> Response {
    let Some(ref path) = state.model_file else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no model file configured" })),
        )
            .into_response();
    };

    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("model.ttl");
            (
                [
                    (header::CONTENT_TYPE, "text/turtle".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!("File download error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Could not download the file." })),
            )
                .into_response()
        }
    }
}
