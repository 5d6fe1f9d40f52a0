//! Common detector interface

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors from AI-authorship detectors
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected model output: {0}")]
    Parse(String),

    #[error("Chat API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Something that can judge whether text was machine-generated
#[async_trait]
pub trait AiDetector: Send + Sync {
    /// Probability in [0, 1] that `text` is AI-generated
    async fn classify(&self, text: &str) -> Result<f64, DetectError>;

    /// Detector name for logs
    fn name(&self) -> &str;
}

/// Thread-safe reference to a detector
pub type SharedDetector = Arc<dyn AiDetector>;

/// Detector that is always maximally uncertain
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralDetector;

#[async_trait]
impl AiDetector for NeutralDetector {
    async fn classify(&self, _text: &str) -> Result<f64, DetectError> {
        Ok(0.5)
    }

    fn name(&self) -> &str {
        "neutral"
    }
}
