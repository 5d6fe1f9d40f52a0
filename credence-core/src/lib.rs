//! Credence Core - credibility scoring engine
//!
//! This crate provides the deterministic primitives:
//! - Domain trust table with exact and suffix lookups
//! - Content type classification from URL and caller hint
//! - Text statistics (word counts, sentence burstiness)
//! - The weighted credibility scorer and its record types

pub mod content;
pub mod error;
pub mod record;
pub mod scorer;
pub mod text;
pub mod trust;

pub use content::*;
pub use error::*;
pub use record::*;
pub use scorer::*;
pub use text::*;
pub use trust::*;

/// Trust assigned to domains absent from the trust table
pub const UNKNOWN_DOMAIN_TRUST: f64 = 0.40;

/// Domains at or below this trust are treated as AI content sources
pub const LOW_TRUST_THRESHOLD: f64 = 0.25;

/// Neutral value for signals that cannot be computed
pub const NEUTRAL_SIGNAL: f64 = 0.5;

/// Upper bound on any reported credibility score
pub const SCORE_CAP: f64 = 92.0;
