//! AI-probability estimator
//!
//! Wraps a detector created once at startup. Estimation never fails:
//! any detector error yields the neutral probability 0.5.

use tracing::{debug, warn};

use credence_core::{truncate_words, NEUTRAL_SIGNAL};

use crate::SharedDetector;

/// Words passed to the detector
pub const MAX_DETECTOR_WORDS: usize = 300;

/// Shared, stateless-after-init AI-probability capability
#[derive(Clone)]
pub struct AiEstimator {
    detector: SharedDetector,
    max_words: usize,
}

impl AiEstimator {
    pub fn new(detector: SharedDetector) -> Self {
        Self {
            detector,
            max_words: MAX_DETECTOR_WORDS,
        }
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words.max(1);
        self
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Probability in [0, 1] that `text` is AI-generated
    pub async fn estimate(&self, text: &str) -> f64 {
        let input = truncate_words(text, self.max_words);

        match self.detector.classify(&input).await {
            Ok(p) if p.is_finite() => {
                let p = p.clamp(0.0, 1.0);
                debug!(detector = self.detector.name(), ai_prob = p, "Estimated AI probability");
                p
            }
            Ok(p) => {
                warn!(detector = self.detector.name(), "Detector returned {}, using neutral", p);
                NEUTRAL_SIGNAL
            }
            Err(e) => {
                warn!(detector = self.detector.name(), "Detector failed: {}", e);
                NEUTRAL_SIGNAL
            }
        }
    }
}
