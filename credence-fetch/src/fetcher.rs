//! Article fetcher
//!
//! Fetches a page and returns its article text. The contract never fails:
//! an empty string means the page could not be fetched or was too short.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use credence_core::word_count;

use crate::{clean_url, create_client, extract_article, FetchConfig, FetchError};

/// Source of article text for a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Article text, or an empty string on any failure
    async fn fetch(&self, url: &str) -> String;
}

/// Fetches pages over HTTP and extracts their main content
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = create_client(&config)?;
        Ok(Self { client, config })
    }

    /// Fetch and extract, surfacing the reason for a failure
    pub async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = clean_url(url);
        if url::Url::parse(&url).is_err() {
            return Err(FetchError::InvalidUrl(url));
        }

        debug!("Fetching: {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let html = response.text().await?;
        let text = extract_article(&html);

        debug!("Extracted {} chars from {}", text.len(), url);
        Ok(text)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(text) => {
                let words = word_count(&text);
                if words < self.config.min_words {
                    warn!("{} returned too little text ({} words)", url, words);
                    return String::new();
                }
                text
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_yields_empty_text() {
        let fetcher = HttpFetcher::new(FetchConfig::default()).unwrap();
        assert_eq!(fetcher.fetch("definitely not a url").await, "");
        assert!(matches!(
            fetcher.try_fetch("definitely not a url").await,
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_empty_text() {
        let config = FetchConfig {
            timeout_secs: 1,
            ..Default::default()
        };
        let fetcher = HttpFetcher::new(config).unwrap();
        // Port 9 on localhost (discard) is closed in test environments
        assert_eq!(fetcher.fetch("http://127.0.0.1:9/article").await, "");
    }
}
