// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the generation pipeline for one job.
//!
//! Steps run strictly in order and report progress to the [`JobStore`] after
//! each one. Colors, template and images always produce a value; content,
//! site build and publishing errors fail the job.

use std::sync::Arc;
use std::time::Instant;

use sitesmith_core::traits::{ContentGenerator, SiteBuildInput, SiteBuilder, TextGenerator};
use sitesmith_core::types::{AdapterType, Job, JobPatch, JobResult, JobStatus, WebsiteRequest};
use sitesmith_core::SitesmithError;
use sitesmith_design::{ColorResolver, TemplateSelector};
use sitesmith_images::ImageFetcher;
use sitesmith_publish::{PublishPipeline, repo_name};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::store::JobStore;

/// The collaborators a pipeline run needs.
pub struct Pipeline {
    pub text: Arc<dyn TextGenerator>,
    pub content: Arc<dyn ContentGenerator>,
    pub images: ImageFetcher,
    pub builder: Arc<dyn SiteBuilder>,
    pub publisher: PublishPipeline,
}

pub struct JobOrchestrator {
    store: Arc<JobStore>,
    colors: ColorResolver,
    templates: TemplateSelector,
    content: Arc<dyn ContentGenerator>,
    images: ImageFetcher,
    builder: Arc<dyn SiteBuilder>,
    publisher: PublishPipeline,
    text_adapter: (String, AdapterType),
}

/// Why a run stopped before completing.
enum Halt {
    /// The job left the store mid-run.
    Gone,
    Failed(SitesmithError),
}

impl From<SitesmithError> for Halt {
    fn from(err: SitesmithError) -> Self {
        Halt::Failed(err)
    }
}

impl JobOrchestrator {
    pub fn new(store: Arc<JobStore>, pipeline: Pipeline) -> Self {
        let text_adapter = (pipeline.text.name().to_string(), pipeline.text.adapter_type());
        Self {
            store,
            colors: ColorResolver::new(Arc::clone(&pipeline.text)),
            templates: TemplateSelector::new(Arc::clone(&pipeline.text)),
            content: pipeline.content,
            images: pipeline.images,
            builder: pipeline.builder,
            publisher: pipeline.publisher,
            text_adapter,
        }
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    /// Name and role of every collaborator, for health reporting.
    pub fn adapters(&self) -> Vec<(String, AdapterType)> {
        let mut adapters = vec![
            self.text_adapter.clone(),
            (self.content.name().to_string(), self.content.adapter_type()),
        ];
        adapters.extend(
            self.images
                .providers()
                .iter()
                .map(|p| (p.name().to_string(), p.adapter_type())),
        );
        adapters.push((self.builder.name().to_string(), self.builder.adapter_type()));
        adapters.extend(self.publisher.adapters());
        adapters
    }

    /// Processes the job on a detached task.
    pub fn spawn(self: &Arc<Self>, job_id: String) -> JoinHandle<()> {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move { orchestrator.process(&job_id).await })
    }

    /// Runs the pipeline once and records the terminal state.
    pub async fn process(&self, job_id: &str) {
        let Some(job) = self.store.get_job(job_id) else {
            debug!(job_id, "job vanished before processing started");
            return;
        };
        let started = Instant::now();
        info!(job_id, company = %job.input.company_name, "processing job");

        match self.run(&job).await {
            Ok(result) => {
                let repo_url = result.repo_url.clone();
                let patch = JobPatch {
                    result: Some(Some(result)),
                    ..JobPatch::progress(100, "Website ready").with_status(JobStatus::Completed)
                };
                if self.store.update_job(job_id, patch).is_some() {
                    sitesmith_prometheus::record_job_finished("completed", started.elapsed().as_secs_f64());
                    info!(job_id, %repo_url, "job completed");
                }
            }
            Err(Halt::Failed(err)) => {
                error!(job_id, error = %err, "job failed");
                let patch = JobPatch {
                    error: Some(Some(err.to_string())),
                    ..JobPatch::progress(0, "Website generation failed").with_status(JobStatus::Failed)
                };
                if self.store.update_job(job_id, patch).is_some() {
                    sitesmith_prometheus::record_job_finished("failed", started.elapsed().as_secs_f64());
                }
            }
            Err(Halt::Gone) => {
                debug!(job_id, "job removed from store mid-run, stopping");
            }
        }
    }

    async fn run(&self, job: &Job) -> Result<JobResult, Halt> {
        let id = job.id.as_str();
        let request = &job.input;

        self.advance(id, JobPatch::progress(5, "Starting website generation").with_status(JobStatus::Processing))?;

        self.advance(id, JobPatch::progress(10, "Choosing brand colors"))?;
        let palette = self.colors.resolve(request).await;
        self.advance(id, JobPatch::progress(20, "Brand colors selected"))?;

        let template = self.templates.select(request, &palette).await;
        self.advance(id, JobPatch::progress(30, format!("Template selected: {template}")))?;

        let content = self.content.generate(request, template, &palette).await?;
        self.advance(id, JobPatch::progress(45, "Website content written"))?;

        let queries = image_queries(&content.image_queries, request);
        let images = self.images.fetch_all(&queries).await;
        let found = images.iter().filter(|i| i.is_some()).count();
        self.advance(id, JobPatch::progress(60, format!("Selected {found} images")))?;

        let files = self
            .builder
            .build(SiteBuildInput {
                request,
                template,
                palette: &palette,
                content: &content,
                images: &images,
            })
            .await?;
        self.advance(id, JobPatch::progress(80, "Site files built"))?;

        let name = repo_name(&request.company_name, id);
        let description = format!("Website for {}", request.company_name.trim());
        let repo = self.publisher.publish_repo(&name, &description, &files).await?;
        self.advance(id, JobPatch::progress(90, "Repository created"))?;

        let deployment = self.publisher.deploy(&repo).await?;

        Ok(JobResult {
            repo_url: repo.html_url,
            repo_name: repo.name,
            deployment_url: deployment.map(|d| d.url),
            template,
            colors: palette,
        })
    }

    fn advance(&self, id: &str, patch: JobPatch) -> Result<(), Halt> {
        match self.store.update_job(id, patch) {
            Some(job) => {
                debug!(job_id = id, progress = job.progress, message = %job.message, "job progress");
                Ok(())
            }
            None => Err(Halt::Gone),
        }
    }
}

/// Search terms from the generated content, or two industry-based defaults.
fn image_queries(generated: &[String], request: &WebsiteRequest) -> Vec<String> {
    let queries: Vec<String> = generated
        .iter()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect();
    if !queries.is_empty() {
        return queries;
    }
    let industry = request.industry.trim();
    vec![format!("{industry} business"), format!("{industry} team")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_queries_are_preferred() {
        let request = WebsiteRequest {
            industry: "Bakery".into(),
            ..Default::default()
        };
        let queries = image_queries(&[" sourdough ".into(), "".into()], &request);
        assert_eq!(queries, vec!["sourdough".to_string()]);
    }

    #[test]
    fn industry_defaults_when_content_has_no_queries() {
        let request = WebsiteRequest {
            industry: "Bakery".into(),
            ..Default::default()
        };
        assert_eq!(
            image_queries(&[], &request),
            vec!["Bakery business".to_string(), "Bakery team".to_string()]
        );
    }
}
