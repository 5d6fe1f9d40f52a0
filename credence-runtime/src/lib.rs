//! Credence Runtime
//!
//! Runs the per-URL pipeline and exposes it over HTTP:
//! - **Cache**: URL-keyed record store
//! - **Analyzer**: cache check, fetch, AI estimate, score, persist
//! - **Server**: `POST /analyze_urls`, `DELETE /flush_cache`

pub mod analyzer;
pub mod cache;
pub mod error;
pub mod server;

pub use analyzer::*;
pub use cache::*;
pub use error::*;
pub use server::*;
