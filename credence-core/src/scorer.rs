//! Credibility scorer
//!
//! Combines the AI-authorship estimate with domain trust, content type,
//! article length and sentence burstiness into a capped weighted score and
//! an ordered list of human-readable reasons.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    burstiness, classify, display_domain, word_count, ContentType, DomainTrustTable,
    LOW_TRUST_THRESHOLD, NEUTRAL_SIGNAL, SCORE_CAP,
};

/// Points available to each signal (sums to 100)
pub const AI_WEIGHT: f64 = 35.0;
pub const DOMAIN_WEIGHT: f64 = 40.0;
pub const TYPE_WEIGHT: f64 = 15.0;
pub const LENGTH_WEIGHT: f64 = 5.0;
pub const BURSTINESS_WEIGHT: f64 = 5.0;

/// AI probability forced onto low-trust domains
pub const LOW_TRUST_AI_FLOOR: f64 = 0.90;

/// Word count at which the length signal saturates
const FULL_LENGTH_WORDS: f64 = 500.0;

const SUBSTANTIVE_WORDS: usize = 500;
const SHALLOW_WORDS: usize = 150;

/// The five normalized signals behind a score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    /// 1 - AI probability
    #[serde(rename = "ai_detection")]
    pub ai_human_confidence: f64,
    pub domain_trust: f64,
    #[serde(rename = "content_type")]
    pub content_type_weight: f64,
    #[serde(rename = "length")]
    pub length_signal: f64,
    #[serde(rename = "burstiness")]
    pub burstiness_signal: f64,
}

impl SignalBundle {
    /// Copy with every signal clamped to [0, 1]
    pub fn clamped(self) -> Self {
        Self {
            ai_human_confidence: clamp_unit(self.ai_human_confidence),
            domain_trust: clamp_unit(self.domain_trust),
            content_type_weight: clamp_unit(self.content_type_weight),
            length_signal: clamp_unit(self.length_signal),
            burstiness_signal: clamp_unit(self.burstiness_signal),
        }
    }

    /// Uncapped weighted sum in [0, 100]
    pub fn weighted_sum(&self) -> f64 {
        let s = self.clamped();
        s.ai_human_confidence * AI_WEIGHT
            + s.domain_trust * DOMAIN_WEIGHT
            + s.content_type_weight * TYPE_WEIGHT
            + s.length_signal * LENGTH_WEIGHT
            + s.burstiness_signal * BURSTINESS_WEIGHT
    }

    /// Capped score rounded to two decimals
    pub fn score(&self) -> f64 {
        round_to(self.weighted_sum().min(SCORE_CAP), 2)
    }

    /// Copy with every signal rounded for reporting
    pub fn rounded(self, decimals: i32) -> Self {
        Self {
            ai_human_confidence: round_to(self.ai_human_confidence, decimals),
            domain_trust: round_to(self.domain_trust, decimals),
            content_type_weight: round_to(self.content_type_weight, decimals),
            length_signal: round_to(self.length_signal, decimals),
            burstiness_signal: round_to(self.burstiness_signal, decimals),
        }
    }
}

/// Inputs for one scoring call
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    /// Estimated probability the text is machine-generated
    pub ai_probability: f64,
    pub url: &'a str,
    /// Caller's content type guess; domain rules may override it
    pub content_type_hint: ContentType,
    /// Article text, when it was available
    pub text: Option<&'a str>,
}

impl<'a> ScoreInput<'a> {
    pub fn new(ai_probability: f64, url: &'a str) -> Self {
        Self {
            ai_probability,
            url,
            content_type_hint: ContentType::Blog,
            text: None,
        }
    }

    pub fn content_type(mut self, hint: ContentType) -> Self {
        self.content_type_hint = hint;
        self
    }

    pub fn text(mut self, text: &'a str) -> Self {
        self.text = Some(text);
        self
    }
}

/// Result of scoring one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityAssessment {
    /// Weighted score in [0, 92]
    pub score: f64,
    /// Reasons in fixed rule order
    pub reasoning: Vec<String>,
    pub signals: SignalBundle,
    /// Content type after domain rules were applied
    pub content_type: ContentType,
    /// Host used in the reasoning
    pub domain: String,
    /// Estimator output as received, clamped to [0, 1]
    pub ai_probability: f64,
    /// AI probability after the low-trust override
    pub effective_ai_probability: f64,
}

/// Pure, thread-safe credibility scorer
#[derive(Debug, Clone)]
pub struct CredibilityScorer {
    trust: Arc<DomainTrustTable>,
}

impl Default for CredibilityScorer {
    fn default() -> Self {
        Self::new(Arc::new(DomainTrustTable::builtin()))
    }
}

impl CredibilityScorer {
    pub fn new(trust: Arc<DomainTrustTable>) -> Self {
        Self { trust }
    }

    pub fn trust_table(&self) -> &DomainTrustTable {
        &self.trust
    }

    /// Score one page. Total over its inputs: never fails.
    pub fn score(&self, input: ScoreInput<'_>) -> CredibilityAssessment {
        let domain_trust = self.trust.lookup(input.url);
        let domain = display_domain(input.url);

        let content_type = classify(input.url, input.content_type_hint);
        let type_weight = content_type.weight();

        let estimate = if input.ai_probability.is_nan() {
            NEUTRAL_SIGNAL
        } else {
            clamp_unit(input.ai_probability)
        };
        let ai_probability = if domain_trust <= LOW_TRUST_THRESHOLD {
            estimate.max(LOW_TRUST_AI_FLOOR)
        } else {
            estimate
        };

        let words = input.text.map(word_count);
        let length_signal = words
            .map(|n| (n as f64 / FULL_LENGTH_WORDS).min(1.0))
            .unwrap_or(NEUTRAL_SIGNAL);
        let burst = input.text.map(burstiness).unwrap_or(NEUTRAL_SIGNAL);

        let signals = SignalBundle {
            ai_human_confidence: 1.0 - ai_probability,
            domain_trust,
            content_type_weight: type_weight,
            length_signal,
            burstiness_signal: burst,
        }
        .clamped();

        let mut reasoning = Vec::with_capacity(5);
        reasoning.push(authorship_reason(ai_probability));
        reasoning.push(domain_reason(&domain, domain_trust));
        if let Some(reason) = content_type_reason(content_type) {
            reasoning.push(reason.to_string());
        }
        if let Some(words) = words {
            if let Some(reason) = length_reason(words) {
                reasoning.push(reason);
            }
            if let Some(reason) = burstiness_reason(burst) {
                reasoning.push(reason.to_string());
            }
        }

        CredibilityAssessment {
            score: signals.score(),
            reasoning,
            signals,
            content_type,
            domain,
            ai_probability: estimate,
            effective_ai_probability: ai_probability,
        }
    }
}

fn authorship_reason(ai_probability: f64) -> String {
    if ai_probability > 0.65 {
        format!(
            "Content appears likely AI-generated ({}% probability)",
            percent(ai_probability)
        )
    } else if ai_probability < 0.35 {
        format!(
            "Content appears human-written ({}% confidence)",
            percent(1.0 - ai_probability)
        )
    } else {
        format!(
            "AI authorship is uncertain ({}% AI probability)",
            percent(ai_probability)
        )
    }
}

// The 0.25 < trust < 0.50 band intentionally reports as unknown.
fn domain_reason(domain: &str, trust: f64) -> String {
    if trust >= 0.90 {
        format!("{domain} is a highly trusted source")
    } else if trust >= 0.75 {
        format!("{domain} has moderate-to-high domain trust")
    } else if trust >= 0.50 {
        format!("{domain} has below-average domain trust")
    } else if trust <= LOW_TRUST_THRESHOLD {
        format!("{domain} is a low-trust or AI content source")
    } else {
        format!("{domain} is an unknown domain with no established trust score")
    }
}

fn content_type_reason(content_type: ContentType) -> Option<&'static str> {
    match content_type {
        ContentType::News => Some("Recognized as a news source"),
        ContentType::Research => {
            Some("Academic or research content carries high credibility weight")
        }
        ContentType::Blog => Some("Blog content carries lower credibility weight"),
        ContentType::Pdf | ContentType::Unknown => None,
    }
}

fn length_reason(words: usize) -> Option<String> {
    if words >= SUBSTANTIVE_WORDS {
        Some(format!("Substantive article length ({words} words)"))
    } else if words < SHALLOW_WORDS {
        Some(format!("Short content may lack depth ({words} words)"))
    } else {
        None
    }
}

fn burstiness_reason(burst: f64) -> Option<&'static str> {
    if burst > 0.65 {
        Some("High sentence variation suggests human authorship")
    } else if burst < 0.35 {
        Some("Low sentence variation is consistent with AI writing")
    } else {
        None
    }
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round_ties_even() as i64
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Round half-to-even at `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
