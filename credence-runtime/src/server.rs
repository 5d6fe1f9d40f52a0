//! HTTP API
//!
//! - `POST /analyze_urls` `{"urls": [...]}` -> array of records or `{url, error}`
//! - `DELETE /flush_cache` -> `{"deleted": n}`
//! - `GET /healthz` -> `{"status": "ok"}`

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use credence_core::AnalysisOutcome;

use crate::{Analyzer, ApiError, RuntimeError};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FlushResponse {
    pub deleted: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Build the API router around a shared analyzer
pub fn create_router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/analyze_urls", post(analyze_urls_handler))
        .route("/flush_cache", delete(flush_cache_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(analyzer)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn analyze_urls_handler(
    State(analyzer): State<Arc<Analyzer>>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<Vec<AnalysisOutcome>> {
    debug!("analyze_urls request with {} URLs", request.urls.len());
    Json(analyzer.analyze_urls(request.urls).await)
}

async fn flush_cache_handler(
    State(analyzer): State<Arc<Analyzer>>,
) -> Result<Json<FlushResponse>, ApiError> {
    let deleted = analyzer.flush().await?;
    Ok(Json(FlushResponse { deleted }))
}

/// Serve the API until Ctrl-C
pub async fn serve(addr: &str, analyzer: Arc<Analyzer>) -> Result<(), RuntimeError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| RuntimeError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!(addr = %addr, "Server listening");

    axum::serve(listener, create_router(analyzer))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
