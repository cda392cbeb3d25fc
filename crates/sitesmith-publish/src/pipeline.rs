// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use sitesmith_core::traits::{Deployer, RepoHost};
use sitesmith_core::types::{AdapterType, Deployment, RepoInfo, SiteFile, slugify};
use sitesmith_core::SitesmithError;
use tracing::info;

/// GitHub limits repository names to 100 characters.
const MAX_REPO_NAME: usize = 100;

/// Publishes generated files and optionally deploys them.
///
/// There are no retries and no rollback: a repository created before a
/// failed deployment stays in place.
#[derive(Clone)]
pub struct PublishPipeline {
    host: Arc<dyn RepoHost>,
    deployer: Option<Arc<dyn Deployer>>,
}

impl PublishPipeline {
    pub fn new(host: Arc<dyn RepoHost>, deployer: Option<Arc<dyn Deployer>>) -> Self {
        Self { host, deployer }
    }

    pub fn has_deployer(&self) -> bool {
        self.deployer.is_some()
    }

    /// Name and role of each configured adapter.
    pub fn adapters(&self) -> Vec<(String, AdapterType)> {
        let mut adapters = vec![(self.host.name().to_string(), self.host.adapter_type())];
        if let Some(deployer) = &self.deployer {
            adapters.push((deployer.name().to_string(), deployer.adapter_type()));
        }
        adapters
    }

    pub async fn publish_repo(
        &self,
        name: &str,
        description: &str,
        files: &[SiteFile],
    ) -> Result<RepoInfo, SitesmithError> {
        let repo = self.host.create_repository(name, description, files).await?;
        info!(repo = %repo.full_name, host = self.host.name(), "site published");
        Ok(repo)
    }

    /// Returns `Ok(None)` when no deployer is configured.
    pub async fn deploy(&self, repo: &RepoInfo) -> Result<Option<Deployment>, SitesmithError> {
        match &self.deployer {
            Some(deployer) => deployer.deploy(repo).await.map(Some),
            None => {
                info!(repo = %repo.full_name, "no deployer configured, skipping deployment");
                Ok(None)
            }
        }
    }
}

/// Repository name for a job: slugified company name plus the first eight
/// characters of the job id.
pub fn repo_name(company_name: &str, job_id: &str) -> String {
    let suffix: String = job_id.chars().filter(|c| *c != '-').take(8).collect();
    let mut base = slugify(company_name);
    if base.is_empty() {
        base = "site".to_string();
    }
    let room = MAX_REPO_NAME - suffix.len() - 1;
    if base.len() > room {
        base.truncate(room);
        while base.ends_with('-') {
            base.pop();
        }
    }
    format!("{base}-{suffix}")
}
