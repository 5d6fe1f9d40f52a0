//! Hosted text-classification detector
//!
//! Calls a Hugging Face inference endpoint serving a binary
//! human/machine text classifier.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{AiDetector, DetectError};

/// Hugging Face detector configuration
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// Bearer token; public models work without one at low rate limits
    pub api_token: Option<String>,
    pub model: String,
    /// Inference API root; `{base_url}/{model}` is called
    pub base_url: String,
    /// Label the model uses for machine-generated text
    pub ai_label: String,
    pub timeout_secs: u64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            model: "Hello-SimpleAI/chatgpt-detector-roberta".to_string(),
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            ai_label: "ChatGPT".to_string(),
            timeout_secs: 30,
        }
    }
}

/// One label/score pair from a classification response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

/// Detector backed by a hosted classifier
pub struct HuggingFaceDetector {
    client: reqwest::Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceDetector {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, DetectError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl AiDetector for HuggingFaceDetector {
    async fn classify(&self, text: &str) -> Result<f64, DetectError> {
        let mut request = self
            .client
            .post(self.endpoint())
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DetectError::Status { status, body });
        }

        let body: serde_json::Value = response.json().await?;
        let top = top_label(body)?;
        debug!(label = %top.label, score = top.score, "Classifier result");

        Ok(probability_from_label(&top, &self.config.ai_label))
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

/// Highest-scoring label from a classification response
pub fn top_label(body: serde_json::Value) -> Result<LabelScore, DetectError> {
    let response: ClassificationResponse =
        serde_json::from_value(body).map_err(|e| DetectError::Parse(e.to_string()))?;

    let labels = match response {
        ClassificationResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
        ClassificationResponse::Flat(labels) => labels,
    };

    labels
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| DetectError::Parse("no labels in response".to_string()))
}

/// AI probability implied by the top label
pub fn probability_from_label(top: &LabelScore, ai_label: &str) -> f64 {
    if top.label == ai_label {
        top.score
    } else {
        1.0 - top.score
    }
}
