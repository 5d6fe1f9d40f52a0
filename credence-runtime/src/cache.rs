//! URL-keyed record cache

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use credence_core::CredibilityRecord;

use crate::CacheError;

/// Persistence contract for scored records, keyed by URL
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, url: &str) -> Result<Option<CredibilityRecord>, CacheError>;

    /// Store a record. An existing record for the same URL is kept.
    async fn put(&self, record: CredibilityRecord) -> Result<(), CacheError>;

    /// Remove every record, returning how many were removed
    async fn clear(&self) -> Result<usize, CacheError>;

    async fn len(&self) -> Result<usize, CacheError>;
}

/// Thread-safe reference to a cache store
pub type SharedCache = Arc<dyn CacheStore>;

/// In-process cache backed by a concurrent map
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, CredibilityRecord>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, url: &str) -> Result<Option<CredibilityRecord>, CacheError> {
        Ok(self.entries.get(url).map(|entry| entry.value().clone()))
    }

    async fn put(&self, record: CredibilityRecord) -> Result<(), CacheError> {
        self.entries.entry(record.url.clone()).or_insert(record);
        Ok(())
    }

    async fn clear(&self) -> Result<usize, CacheError> {
        let keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        Ok(keys
            .iter()
            .filter(|key| self.entries.remove(*key).is_some())
            .count())
    }

    async fn len(&self) -> Result<usize, CacheError> {
        Ok(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_core::{CredibilityScorer, ScoreInput};

    fn record(url: &str, ai_probability: f64) -> CredibilityRecord {
        let assessment = CredibilityScorer::default().score(ScoreInput::new(ai_probability, url));
        CredibilityRecord::from_assessment(url, assessment)
    }

    #[tokio::test]
    async fn test_get_put() {
        let cache = MemoryCache::new();
        assert!(cache.get("https://a.test/").await.unwrap().is_none());

        let r = record("https://a.test/", 0.2);
        cache.put(r.clone()).await.unwrap();
        assert_eq!(cache.get("https://a.test/").await.unwrap(), Some(r));
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_first_record_wins() {
        let cache = MemoryCache::new();
        let first = record("https://a.test/", 0.2);
        cache.put(first.clone()).await.unwrap();
        cache.put(record("https://a.test/", 0.9)).await.unwrap();

        assert_eq!(cache.get("https://a.test/").await.unwrap().unwrap().id, first.id);
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_counts() {
        let cache = MemoryCache::new();
        cache.put(record("https://a.test/", 0.2)).await.unwrap();
        cache.put(record("https://b.test/", 0.2)).await.unwrap();

        assert_eq!(cache.clear().await.unwrap(), 2);
        assert_eq!(cache.clear().await.unwrap(), 0);
        assert!(cache.get("https://a.test/").await.unwrap().is_none());
    }
}
