//! Runtime errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use credence_core::FETCH_FAILED;

/// Errors from a cache backend
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Per-URL pipeline failures, reported inside batch results
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("{}", FETCH_FAILED)]
    FetchFailed,

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Analysis task failed: {0}")]
    Task(String),
}

/// Errors from running the HTTP server
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Errors returned from HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Cache(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
