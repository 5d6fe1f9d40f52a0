//! Errors from the scoring engine's configurable inputs

use thiserror::Error;

/// Errors from loading engine configuration
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to read trust table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid trust table: {0}")]
    TrustTable(String),
}
