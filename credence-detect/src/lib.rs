//! Credence Detect
//!
//! Estimates the probability that a text was machine-generated:
//! - **HuggingFace**: a hosted text-classification model
//! - **LLM**: an OpenAI-compatible or Anthropic chat model asked for a probability
//! - **Neutral**: always uncertain, for offline runs
//!
//! Detectors are wrapped by [`AiEstimator`], which truncates input and
//! absorbs every failure into a neutral 0.5.

pub mod detector;
pub mod estimator;
pub mod huggingface;
pub mod llm;

pub use detector::*;
pub use estimator::*;
pub use huggingface::*;
pub use llm::*;
