//! Credence Fetch Layer
//!
//! Turns a URL into plain article text:
//! - HTTP client with browser-like headers
//! - Readability-style main-content extraction
//! - A never-failing fetcher contract (empty text means failure)

pub mod client;
pub mod extract;
pub mod fetcher;

pub use client::*;
pub use extract::*;
pub use fetcher::*;
