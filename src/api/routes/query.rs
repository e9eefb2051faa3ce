//! The SPARQL query endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::api::server::AppState;
use crate::error::ProxyError;

/// Request body for `POST /sparql`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// The raw SPARQL query. Absent and `null` are both treated as missing.
    #[serde(default)]
    pub query: Option<String>,
}

/// POST /sparql — answer a query, from cache when possible.
///
/// 400 when the query is missing or empty, 500 when the upstream endpoint
/// fails (generic message; the cause is logged, not exposed), 200 with the
/// raw SPARQL JSON results otherwise.
pub async fn submit_query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> (StatusCode, Json<Value>) {
    let query = req.query.unwrap_or_default();

    match state.proxy.submit(&query).await {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(ProxyError::EmptyQuery) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing SPARQL query in request body" })),
        ),
        Err(e) => {
            error!("SPARQL query failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "SPARQL query failed" })),
            )
        }
    }
}
