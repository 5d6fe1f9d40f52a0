//! Persisted analysis results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ContentType, CredibilityAssessment, SignalBundle};

/// Decimal places kept for signals in a stored record
const SIGNAL_PRECISION: i32 = 3;

/// Error reported when a page yields no usable text
pub const FETCH_FAILED: &str = "Failed to fetch content";

/// The stored, immutable result of scoring one URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityRecord {
    /// Opaque record identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub url: String,
    /// Estimator output before the low-trust override
    pub ai_probability: f64,
    pub credibility_score: f64,
    pub reasoning: Vec<String>,
    pub signals: SignalBundle,
    pub content_type: ContentType,
    pub analyzed_at: DateTime<Utc>,
}

impl CredibilityRecord {
    /// Build a fresh record from a scorer assessment
    pub fn from_assessment(url: &str, assessment: CredibilityAssessment) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.to_string(),
            ai_probability: assessment.ai_probability,
            credibility_score: assessment.score,
            reasoning: assessment.reasoning,
            signals: assessment.signals.rounded(SIGNAL_PRECISION),
            content_type: assessment.content_type,
            analyzed_at: Utc::now(),
        }
    }
}

/// Per-URL result of an analysis batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Scored(CredibilityRecord),
    Failed { url: String, error: String },
}

impl AnalysisOutcome {
    pub fn failed(url: &str, error: impl Into<String>) -> Self {
        AnalysisOutcome::Failed {
            url: url.to_string(),
            error: error.into(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            AnalysisOutcome::Scored(record) => &record.url,
            AnalysisOutcome::Failed { url, .. } => url,
        }
    }

    pub fn record(&self) -> Option<&CredibilityRecord> {
        match self {
            AnalysisOutcome::Scored(record) => Some(record),
            AnalysisOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed { .. })
    }
}
