//! Axum server for the caching proxy.

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::proxy::QueryProxy;

/// Shared state for all route handlers, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    /// The cache proxy orchestrator.
    pub proxy: Arc<QueryProxy>,
    /// RDF mapping file served at `GET /model`, if configured.
    pub model_file: Option<PathBuf>,
}

impl AppState {
    pub fn new(proxy: Arc<QueryProxy>, model_file: Option<PathBuf>) -> Self {
        Self { proxy, model_file }
    }
}

/// Build the axum router with all routes.
///
/// CORS is permissive because the frontend may be served from any origin
/// during development. When `static_dir` is set, unmatched paths fall back to
/// static file serving (the frontend's `index.html` lives there).
pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let shared_state = Arc::new(state);

    let router = Router::new()
        .route("/sparql", post(super::routes::query::submit_query))
        .route("/health", get(super::routes::health::get_health))
        .route("/model", get(super::routes::model::download_model))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    if let Some(dir) = static_dir {
        router.fallback_service(tower_http::services::ServeDir::new(dir))
    } else {
        router
    }
}

/// Bind and serve until ctrl-c.
pub async fn start_server(
    addr: &str,
    state: AppState,
    static_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(state, static_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("SPARQL proxy listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install ctrl-c handler: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
