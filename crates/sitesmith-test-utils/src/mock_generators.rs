// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mocks for the model-backed pipeline steps and photo search.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use sitesmith_core::template::TemplateId;
use sitesmith_core::traits::{
    ContentGenerator, GenerationRequest, ImageSearch, ServiceAdapter, SiteBuildInput, SiteBuilder,
    TextGenerator,
};
use sitesmith_core::types::{
    AdapterType, ColorPalette, ImageData, ImageProvider, SiteContent, SiteFile, WebsiteRequest,
    slugify,
};
use sitesmith_core::SitesmithError;

use crate::fixtures::sample_content;

/// A text generator answering from a FIFO queue.
///
/// An empty queue is a provider error, which exercises the fallback paths of
/// the color and template steps.
pub struct MockTextGenerator {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockTextGenerator {
    fn name(&self) -> &str {
        "mock-text"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::TextGenerator
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, SitesmithError> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| SitesmithError::Provider {
                message: "mock text generator has no responses queued".into(),
                source: None,
            })
    }
}

/// What a [`MockImageSearch`] answers.
#[derive(Debug, Clone, Copy)]
enum SearchBehavior {
    Found(ImageProvider),
    Empty,
    Fail,
}

/// A photo provider with scripted behavior and optional per-query delays.
pub struct MockImageSearch {
    behavior: SearchBehavior,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl MockImageSearch {
    /// Answers every query with a photo attributed to `provider`.
    pub fn returning(provider: ImageProvider) -> Self {
        Self::with_behavior(SearchBehavior::Found(provider))
    }

    /// Finds nothing for any query.
    pub fn empty() -> Self {
        Self::with_behavior(SearchBehavior::Empty)
    }

    /// Fails every query with an upstream error.
    pub fn failing() -> Self {
        Self::with_behavior(SearchBehavior::Fail)
    }

    fn with_behavior(behavior: SearchBehavior) -> Self {
        Self {
            behavior,
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleeps for `delay` before answering `query`.
    pub fn with_delay_for(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceAdapter for MockImageSearch {
    fn name(&self) -> &str {
        match self.behavior {
            SearchBehavior::Found(ImageProvider::Unsplash) => "mock-unsplash",
            SearchBehavior::Found(ImageProvider::Pexels) => "mock-pexels",
            SearchBehavior::Empty | SearchBehavior::Fail => "mock-images",
        }
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ImageSearch
    }
}

#[async_trait]
impl ImageSearch for MockImageSearch {
    async fn search(&self, query: &str) -> Result<Option<ImageData>, SitesmithError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        match self.behavior {
            SearchBehavior::Found(source) => Ok(Some(ImageData {
                url: format!("https://images.example/{source}/{}.jpg", slugify(query)),
                alt: query.to_string(),
                photographer: "Test Photographer".into(),
                photographer_url: Some("https://images.example/@test".into()),
                source,
            })),
            SearchBehavior::Empty => Ok(None),
            SearchBehavior::Fail => Err(SitesmithError::Upstream {
                service: "mock-images".into(),
                status: Some(500),
                body: "mock failure".into(),
            }),
        }
    }
}

/// Produces [`sample_content`] for whatever pages were requested.
pub struct MockContentGenerator {
    failure: Option<String>,
    calls: AtomicUsize,
    gate: Option<Notify>,
    entered: Notify,
}

impl MockContentGenerator {
    pub fn new() -> Self {
        Self {
            failure: None,
            calls: AtomicUsize::new(0),
            gate: None,
            entered: Notify::new(),
        }
    }

    /// Fails every call with a content error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Holds every call until [`release`](Self::release) is called, so a test
    /// can act on a job while it is mid-pipeline.
    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::new()
        }
    }

    /// Resolves once a call has started (and, when gated, is waiting).
    pub async fn wait_until_called(&self) {
        self.entered.notified().await;
    }

    /// Lets one held call continue.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockContentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockContentGenerator {
    fn name(&self) -> &str {
        "mock-content"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ContentGenerator
    }
}

#[async_trait]
impl ContentGenerator for MockContentGenerator {
    async fn generate(
        &self,
        request: &WebsiteRequest,
        _template: TemplateId,
        _palette: &ColorPalette,
    ) -> Result<SiteContent, SitesmithError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.failure {
            Some(message) => Err(SitesmithError::Content(message.clone())),
            None => Ok(sample_content(request)),
        }
    }
}

/// Renders one trivial HTML file per page and remembers what it was given.
pub struct MockSiteBuilder {
    fail: bool,
    builds: Mutex<Vec<(TemplateId, usize)>>,
}

impl MockSiteBuilder {
    pub fn new() -> Self {
        Self {
            fail: false,
            builds: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            builds: Mutex::new(Vec::new()),
        }
    }

    /// Template and image count of every build so far.
    pub async fn builds(&self) -> Vec<(TemplateId, usize)> {
        self.builds.lock().await.clone()
    }
}

impl Default for MockSiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockSiteBuilder {
    fn name(&self) -> &str {
        "mock-site"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SiteBuilder
    }
}

#[async_trait]
impl SiteBuilder for MockSiteBuilder {
    async fn build(&self, input: SiteBuildInput<'_>) -> Result<Vec<SiteFile>, SitesmithError> {
        let found = input.images.iter().filter(|i| i.is_some()).count();
        self.builds.lock().await.push((input.template, found));
        if self.fail {
            return Err(SitesmithError::Content("mock site builder failure".into()));
        }
        Ok(input
            .content
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let path = if i == 0 {
                    "index.html".to_string()
                } else {
                    format!("{}.html", page.slug)
                };
                SiteFile::new(path, format!("<h1>{}</h1>", page.title))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn text_generator_pops_in_order_then_errors() {
        let generator = MockTextGenerator::with_responses(vec!["a".into(), "b".into()]);
        assert_eq!(generator.generate(GenerationRequest::json("1")).await.unwrap(), "a");
        assert_eq!(generator.generate(GenerationRequest::json("2")).await.unwrap(), "b");
        assert!(generator.generate(GenerationRequest::json("3")).await.is_err());
        assert_eq!(generator.call_count().await, 3);
        assert_eq!(generator.requests().await[1].prompt, "2");
    }

    #[tokio::test]
    async fn image_search_behaviors() {
        let found = MockImageSearch::returning(ImageProvider::Pexels);
        let image = found.search("fresh bread").await.unwrap().unwrap();
        assert_eq!(image.source, ImageProvider::Pexels);
        assert!(image.url.ends_with("fresh-bread.jpg"));

        assert!(MockImageSearch::empty().search("x").await.unwrap().is_none());
        assert!(MockImageSearch::failing().search("x").await.is_err());
        assert_eq!(found.call_count(), 1);
    }

    #[tokio::test]
    async fn content_generator_follows_requested_pages() {
        let request = crate::sample_request();
        let content = MockContentGenerator::new()
            .generate(&request, TemplateId::default(), &ColorPalette::fallback())
            .await
            .unwrap();
        let slugs: Vec<_> = content.pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["home", "menu", "contact"]);
    }

    #[tokio::test]
    async fn gated_content_waits_for_release() {
        let generator = Arc::new(MockContentGenerator::gated());
        let call = tokio::spawn({
            let generator = Arc::clone(&generator);
            async move {
                generator
                    .generate(&crate::sample_request(), TemplateId::default(), &ColorPalette::fallback())
                    .await
            }
        });

        generator.wait_until_called().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!call.is_finished());

        generator.release();
        assert!(call.await.unwrap().is_ok());
        assert_eq!(generator.call_count(), 1);
    }
}
