// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a job store, an orchestrator backed by mock
//! collaborators and the gateway router, so tests can drive the whole system
//! through HTTP requests or call the orchestrator directly.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sitesmith_config::SitesmithConfig;
use sitesmith_core::traits::{ContentGenerator, CrmRelay, Deployer, ImageSearch, SiteBuilder};
use sitesmith_core::types::{ImageProvider, Job, WebsiteRequest};
use sitesmith_gateway::{GatewayState, MetricsRender, build_router};
use sitesmith_images::ImageFetcher;
use sitesmith_jobs::{JobOrchestrator, JobStore, Pipeline};
use sitesmith_publish::PublishPipeline;

use crate::mock_generators::{MockContentGenerator, MockImageSearch, MockSiteBuilder, MockTextGenerator};
use crate::mock_services::{MockCrmRelay, MockDeployer, MockRepoHost};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: SitesmithConfig,
    text_responses: Vec<String>,
    content: MockContentGenerator,
    site: MockSiteBuilder,
    repo_host: MockRepoHost,
    deployer: Option<MockDeployer>,
    crm: Option<MockCrmRelay>,
    metrics: Option<MetricsRender>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = SitesmithConfig::default();
        config.status.poll_interval_ms = 20;
        config.status.max_stream_secs = 5;
        Self {
            config,
            text_responses: Vec::new(),
            content: MockContentGenerator::new(),
            site: MockSiteBuilder::new(),
            repo_host: MockRepoHost::new(),
            deployer: Some(MockDeployer::new()),
            crm: Some(MockCrmRelay::new()),
            metrics: None,
        }
    }

    /// Queued answers for the text generator. With none queued the color and
    /// template steps fall back to their defaults.
    pub fn with_text_responses(mut self, responses: Vec<String>) -> Self {
        self.text_responses = responses;
        self
    }

    pub fn with_failing_content(mut self, message: &str) -> Self {
        self.content = MockContentGenerator::failing(message);
        self
    }

    /// Content generation blocks until `harness.content.release()`.
    pub fn with_gated_content(mut self) -> Self {
        self.content = MockContentGenerator::gated();
        self
    }

    pub fn with_failing_site_builder(mut self) -> Self {
        self.site = MockSiteBuilder::failing();
        self
    }

    pub fn with_failing_repo_host(mut self) -> Self {
        self.repo_host = MockRepoHost::failing();
        self
    }

    pub fn with_deployer(mut self, deployer: Option<MockDeployer>) -> Self {
        self.deployer = deployer;
        self
    }

    pub fn with_crm(mut self, crm: Option<MockCrmRelay>) -> Self {
        self.crm = crm;
        self
    }

    pub fn with_metrics(mut self, render: MetricsRender) -> Self {
        self.metrics = Some(render);
        self
    }

    /// Adjusts the configuration before anything is built.
    pub fn with_config(mut self, adjust: impl FnOnce(&mut SitesmithConfig)) -> Self {
        adjust(&mut self.config);
        self
    }

    pub fn build(self) -> TestHarness {
        let text = Arc::new(MockTextGenerator::with_responses(self.text_responses));
        let content = Arc::new(self.content);
        let site = Arc::new(self.site);
        let repo_host = Arc::new(self.repo_host);
        let deployer = self.deployer.map(Arc::new);
        let crm = self.crm.map(Arc::new);
        let images = Arc::new(MockImageSearch::returning(ImageProvider::Unsplash));

        let store = Arc::new(JobStore::from_config(&self.config.jobs));
        let publisher = PublishPipeline::new(
            repo_host.clone(),
            deployer.clone().map(|d| d as Arc<dyn Deployer>),
        );
        let orchestrator = Arc::new(JobOrchestrator::new(
            Arc::clone(&store),
            Pipeline {
                text: text.clone(),
                content: content.clone() as Arc<dyn ContentGenerator>,
                images: ImageFetcher::new(
                    Some(images.clone() as Arc<dyn ImageSearch>),
                    None,
                    Duration::from_secs(1),
                    self.config.images.max_queries,
                ),
                builder: site.clone() as Arc<dyn SiteBuilder>,
                publisher,
            },
        ));

        let mut state = GatewayState::new(Arc::clone(&store), Arc::clone(&orchestrator), &self.config);
        if let Some(crm) = &crm {
            state = state.with_crm(crm.clone() as Arc<dyn CrmRelay>);
        }
        if let Some(render) = self.metrics {
            state = state.with_metrics(render);
        }

        TestHarness {
            store,
            orchestrator,
            state,
            text,
            content,
            site,
            images,
            repo_host,
            deployer,
            crm,
            config: self.config,
        }
    }
}

/// A complete in-memory Sitesmith with mock collaborators.
pub struct TestHarness {
    pub store: Arc<JobStore>,
    pub orchestrator: Arc<JobOrchestrator>,
    pub state: GatewayState,
    pub text: Arc<MockTextGenerator>,
    pub content: Arc<MockContentGenerator>,
    pub site: Arc<MockSiteBuilder>,
    pub images: Arc<MockImageSearch>,
    pub repo_host: Arc<MockRepoHost>,
    pub deployer: Option<Arc<MockDeployer>>,
    pub crm: Option<Arc<MockCrmRelay>>,
    pub config: SitesmithConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The gateway router over this harness's state, without a static dir.
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), None)
    }

    /// Creates a job and runs the pipeline to completion on this task.
    pub async fn run_job(&self, request: WebsiteRequest) -> Job {
        let job = self.store.create_job(request);
        self.orchestrator.process(&job.id).await;
        self.store.get_job(&job.id).unwrap_or(job)
    }

    /// Polls the store until the job is terminal or `timeout` passes.
    pub async fn wait_for_terminal(&self, job_id: &str, timeout: Duration) -> Option<Job> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let job = self.store.get_job(job_id)?;
            if job.status.is_terminal() {
                return Some(job);
            }
            if tokio::time::Instant::now() >= deadline {
                return Some(job);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_request;
    use sitesmith_core::types::JobStatus;

    #[tokio::test]
    async fn harness_runs_a_job_to_completion() {
        let harness = TestHarness::builder().build();
        let job = harness.run_job(sample_request()).await;
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(harness.repo_host.created().await.len(), 1);
    }

    #[tokio::test]
    async fn harness_without_deployer_leaves_deployment_url_empty() {
        let harness = TestHarness::builder().with_deployer(None).build();
        let job = harness.run_job(sample_request()).await;
        let result = job.result.unwrap();
        assert!(result.deployment_url.is_none());
        assert!(result.repo_url.starts_with("https://github.com/"));
    }
}
