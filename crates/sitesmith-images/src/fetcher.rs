// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent, time-boxed photo lookup across a primary and a fallback provider.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use sitesmith_core::traits::ImageSearch;
use sitesmith_core::types::ImageData;
use tracing::{debug, warn};

/// Looks up one photo per search term.
///
/// Each provider call gets its own timeout. A term that fails everywhere
/// yields `None` and never affects the other terms.
pub struct ImageFetcher {
    primary: Option<Arc<dyn ImageSearch>>,
    fallback: Option<Arc<dyn ImageSearch>>,
    timeout: Duration,
    max_queries: usize,
}

impl ImageFetcher {
    pub fn new(
        primary: Option<Arc<dyn ImageSearch>>,
        fallback: Option<Arc<dyn ImageSearch>>,
        timeout: Duration,
        max_queries: usize,
    ) -> Self {
        Self {
            primary,
            fallback,
            timeout,
            max_queries,
        }
    }

    /// A fetcher with no providers; every lookup yields `None`.
    pub fn disabled() -> Self {
        Self::new(None, None, Duration::from_secs(5), 2)
    }

    /// Configured providers, primary first.
    pub fn providers(&self) -> Vec<Arc<dyn ImageSearch>> {
        self.primary.iter().chain(self.fallback.iter()).cloned().collect()
    }

    /// Results aligned with the first `max_queries` terms.
    pub async fn fetch_all(&self, queries: &[String]) -> Vec<Option<ImageData>> {
        let lookups = queries
            .iter()
            .take(self.max_queries)
            .map(|query| self.lookup(query));
        join_all(lookups).await
    }

    async fn lookup(&self, query: &str) -> Option<ImageData> {
        for provider in [&self.primary, &self.fallback].into_iter().flatten() {
            match tokio::time::timeout(self.timeout, provider.search(query)).await {
                Ok(Ok(Some(image))) => {
                    debug!(query, provider = provider.name(), "image found");
                    sitesmith_prometheus::record_image_lookup(provider.name());
                    return Some(image);
                }
                Ok(Ok(None)) => {
                    debug!(query, provider = provider.name(), "no image for query");
                }
                Ok(Err(e)) => {
                    warn!(query, provider = provider.name(), error = %e, "image search failed");
                }
                Err(_) => {
                    warn!(
                        query,
                        provider = provider.name(),
                        timeout_ms = self.timeout.as_millis() as u64,
                        "image search timed out"
                    );
                }
            }
        }
        sitesmith_prometheus::record_image_lookup("none");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitesmith_core::types::ImageProvider;
    use sitesmith_test_utils::MockImageSearch;

    fn terms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn primary_answers_each_term() {
        let primary = Arc::new(MockImageSearch::returning(ImageProvider::Unsplash));
        let fetcher = ImageFetcher::new(Some(primary.clone()), None, Duration::from_secs(1), 2);
        let images = fetcher.fetch_all(&terms(&["bakery", "bread"])).await;
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|i| i.as_ref().map(|i| i.source) == Some(ImageProvider::Unsplash)));
        assert_eq!(primary.call_count(), 2);
    }

    #[tokio::test]
    async fn only_max_queries_terms_are_looked_up() {
        let primary = Arc::new(MockImageSearch::returning(ImageProvider::Unsplash));
        let fetcher = ImageFetcher::new(Some(primary.clone()), None, Duration::from_secs(1), 2);
        let images = fetcher.fetch_all(&terms(&["a", "b", "c", "d"])).await;
        assert_eq!(images.len(), 2);
        assert_eq!(primary.call_count(), 2);
    }

    #[tokio::test]
    async fn falls_back_when_primary_errors_or_is_empty() {
        let fallback = Arc::new(MockImageSearch::returning(ImageProvider::Pexels));
        let fetcher = ImageFetcher::new(
            Some(Arc::new(MockImageSearch::failing())),
            Some(fallback.clone()),
            Duration::from_secs(1),
            2,
        );
        let images = fetcher.fetch_all(&terms(&["roofing"])).await;
        assert_eq!(images[0].as_ref().unwrap().source, ImageProvider::Pexels);

        let fetcher = ImageFetcher::new(
            Some(Arc::new(MockImageSearch::empty())),
            Some(fallback),
            Duration::from_secs(1),
            2,
        );
        let images = fetcher.fetch_all(&terms(&["roofing"])).await;
        assert_eq!(images[0].as_ref().unwrap().source, ImageProvider::Pexels);
    }

    #[tokio::test]
    async fn timed_out_term_is_none_without_aborting_the_other() {
        // The slow term exceeds the budget on both providers; the fast one does not.
        let slow_primary = MockImageSearch::returning(ImageProvider::Unsplash)
            .with_delay_for("slow", Duration::from_millis(500));
        let slow_fallback = MockImageSearch::returning(ImageProvider::Pexels)
            .with_delay_for("slow", Duration::from_millis(500));
        let fetcher = ImageFetcher::new(
            Some(Arc::new(slow_primary)),
            Some(Arc::new(slow_fallback)),
            Duration::from_millis(50),
            2,
        );

        let images = fetcher.fetch_all(&terms(&["slow", "fast"])).await;
        assert!(images[0].is_none());
        assert_eq!(images[1].as_ref().unwrap().source, ImageProvider::Unsplash);
    }

    #[tokio::test]
    async fn no_providers_yields_none_per_term() {
        let images = ImageFetcher::disabled().fetch_all(&terms(&["a", "b"])).await;
        assert_eq!(images, vec![None, None]);
    }
}
