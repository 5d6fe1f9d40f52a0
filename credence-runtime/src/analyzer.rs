//! Analysis orchestrator
//!
//! Runs each URL through cache check, fetch, AI estimation and scoring:
//! - URLs are independent; a failure on one never affects the others
//! - Batches run with bounded concurrency and keep input order
//! - Concurrent requests for the same URL compute at most once

use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use credence_core::{
    hint_from_url, word_count, AnalysisOutcome, CredibilityRecord, CredibilityScorer, ScoreInput,
};
use credence_detect::AiEstimator;
use credence_fetch::PageFetcher;

use crate::{AnalyzeError, CacheError, SharedCache};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// URLs processed at once within a batch
    pub max_concurrent: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { max_concurrent: 3 }
    }
}

/// The per-URL analysis pipeline
pub struct Analyzer {
    fetcher: Arc<dyn PageFetcher>,
    estimator: AiEstimator,
    scorer: CredibilityScorer,
    cache: SharedCache,
    config: AnalyzerConfig,
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl Analyzer {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        estimator: AiEstimator,
        scorer: CredibilityScorer,
        cache: SharedCache,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            fetcher,
            estimator,
            scorer,
            cache,
            config,
            inflight: DashMap::new(),
        }
    }

    /// Analyze one URL, reporting any failure as an outcome
    pub async fn analyze_url(&self, url: &str) -> AnalysisOutcome {
        match self.try_analyze_url(url).await {
            Ok(record) => AnalysisOutcome::Scored(record),
            Err(e) => {
                warn!("Analysis of {} failed: {}", url, e);
                AnalysisOutcome::failed(url, e.to_string())
            }
        }
    }

    /// Analyze one URL, serving from cache when possible
    pub async fn try_analyze_url(&self, url: &str) -> Result<CredibilityRecord, AnalyzeError> {
        if let Some(record) = self.cache.get(url).await? {
            debug!("Cache hit: {}", url);
            return Ok(record);
        }

        let lock = self
            .inflight
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock().await;

        // Another task may have finished this URL while we waited
        let result = match self.cache.get(url).await {
            Ok(Some(record)) => {
                debug!("Cache hit after wait: {}", url);
                Ok(record)
            }
            Ok(None) => self.compute(url).await,
            Err(e) => Err(e.into()),
        };

        drop(guard);
        self.inflight
            .remove_if(url, |_, slot| Arc::strong_count(slot) <= 2);

        result
    }

    async fn compute(&self, url: &str) -> Result<CredibilityRecord, AnalyzeError> {
        info!("Analyzing: {}", url);

        let text = self.fetcher.fetch(url).await;
        if text.is_empty() {
            return Err(AnalyzeError::FetchFailed);
        }

        debug!("Scoring {} words from {}", word_count(&text), url);
        let ai_probability = self.estimator.estimate(&text).await;

        let assessment = self.scorer.score(
            ScoreInput::new(ai_probability, url)
                .content_type(hint_from_url(url))
                .text(&text),
        );
        let record = CredibilityRecord::from_assessment(url, assessment);

        self.cache.put(record.clone()).await?;

        info!(
            "Done: {} -> ai_prob={:.3}, credibility={}",
            url, record.ai_probability, record.credibility_score
        );
        Ok(record)
    }

    /// Analyze a batch with bounded concurrency; results follow input order
    pub async fn analyze_urls(self: &Arc<Self>, urls: Vec<String>) -> Vec<AnalysisOutcome> {
        info!("Received {} URLs", urls.len());
        let max_concurrent = self.config.max_concurrent.max(1);

        stream::iter(urls)
            .map(|url| {
                let analyzer = Arc::clone(self);
                async move {
                    let task_url = url.clone();
                    let task = tokio::spawn(async move { analyzer.analyze_url(&task_url).await });
                    match task.await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!("Analysis task for {} aborted: {}", url, e);
                            AnalysisOutcome::failed(&url, AnalyzeError::Task(e.to_string()).to_string())
                        }
                    }
                }
            })
            .buffered(max_concurrent)
            .collect()
            .await
    }

    /// Drop every cached record, returning how many were removed
    pub async fn flush(&self) -> Result<usize, CacheError> {
        let deleted = self.cache.clear().await?;
        info!("Flushed {} cached records", deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCache;
    use async_trait::async_trait;
    use credence_core::{ContentType, FETCH_FAILED};
    use credence_detect::{AiDetector, DetectError};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubFetcher {
        pages: HashMap<String, String>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl StubFetcher {
        fn new(pages: &[(&str, String)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, t)| (u.to_string(), t.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if url.contains("panic") {
                panic!("fetcher exploded");
            }
            self.pages.get(url).cloned().unwrap_or_default()
        }
    }

    struct FixedDetector(f64);

    #[async_trait]
    impl AiDetector for FixedDetector {
        async fn classify(&self, _text: &str) -> Result<f64, DetectError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn article() -> String {
        "Officials confirmed the new transit schedule would start next week. ".repeat(60)
    }

    fn analyzer(fetcher: Arc<StubFetcher>, ai_probability: f64) -> Arc<Analyzer> {
        Arc::new(Analyzer::new(
            fetcher,
            AiEstimator::new(Arc::new(FixedDetector(ai_probability))),
            CredibilityScorer::default(),
            Arc::new(MemoryCache::new()),
            AnalyzerConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_scores_and_caches() {
        let url = "https://www.nytimes.com/article";
        let fetcher = Arc::new(StubFetcher::new(&[(url, article())]));
        let analyzer = analyzer(fetcher.clone(), 0.10);

        let first = analyzer.analyze_url(url).await;
        let record = first.record().cloned().unwrap();
        assert_eq!(record.content_type, ContentType::News);
        assert_eq!(record.reasoning[0], "Content appears human-written (90% confidence)");
        assert_eq!(record.reasoning[1], "nytimes.com is a highly trusted source");
        assert_eq!(record.reasoning[3], "Substantive article length (600 words)");

        let second = analyzer.analyze_url(url).await;
        assert_eq!(second, first);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_not_cached() {
        let fetcher = Arc::new(StubFetcher::new(&[]));
        let analyzer = analyzer(fetcher.clone(), 0.5);

        let outcome = analyzer.analyze_url("https://missing.test/").await;
        assert_eq!(
            outcome,
            AnalysisOutcome::failed("https://missing.test/", FETCH_FAILED)
        );

        analyzer.analyze_url("https://missing.test/").await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_isolates_failures() {
        let fetcher = Arc::new(StubFetcher::new(&[
            ("https://a.test/", article()),
            ("https://c.test/", article()),
        ]));
        let analyzer = analyzer(fetcher, 0.5);

        let urls = vec![
            "https://a.test/".to_string(),
            "https://b.test/".to_string(),
            "https://panic.test/".to_string(),
            "https://c.test/".to_string(),
        ];
        let outcomes = analyzer.analyze_urls(urls.clone()).await;

        let returned: Vec<&str> = outcomes.iter().map(|o| o.url()).collect();
        assert_eq!(returned, urls.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(!outcomes[0].is_failed());
        assert!(outcomes[1].is_failed());
        assert!(outcomes[2].is_failed());
        assert!(!outcomes[3].is_failed());
    }

    #[tokio::test]
    async fn test_concurrent_same_url_computes_once() {
        let url = "https://example.com/story";
        let mut stub = StubFetcher::new(&[(url, article())]);
        stub.delay = Duration::from_millis(50);
        let fetcher = Arc::new(stub);
        let analyzer = analyzer(fetcher.clone(), 0.5);

        let outcomes = analyzer
            .analyze_urls(vec![url.to_string(), url.to_string(), url.to_string()])
            .await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        let ids: Vec<_> = outcomes.iter().map(|o| o.record().unwrap().id).collect();
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert!(analyzer.inflight.is_empty());
    }

    #[tokio::test]
    async fn test_flush() {
        let url = "https://a.test/";
        let fetcher = Arc::new(StubFetcher::new(&[(url, article())]));
        let analyzer = analyzer(fetcher.clone(), 0.5);

        analyzer.analyze_url(url).await;
        assert_eq!(analyzer.flush().await.unwrap(), 1);
        assert_eq!(analyzer.flush().await.unwrap(), 0);

        analyzer.analyze_url(url).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let analyzer = analyzer(Arc::new(StubFetcher::new(&[])), 0.5);
        assert!(analyzer.analyze_urls(Vec::new()).await.is_empty());
    }
}
