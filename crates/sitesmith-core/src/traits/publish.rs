// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source-hosting and deployment traits.

use async_trait::async_trait;

use crate::error::SitesmithError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{Deployment, RepoInfo, SiteFile};

/// Creates a new repository holding the given files.
#[async_trait]
pub trait RepoHost: ServiceAdapter {
    async fn create_repository(
        &self,
        name: &str,
        description: &str,
        files: &[SiteFile],
    ) -> Result<RepoInfo, SitesmithError>;
}

/// Deploys a repository commit and returns the live URL.
#[async_trait]
pub trait Deployer: ServiceAdapter {
    async fn deploy(&self, repo: &RepoInfo) -> Result<Deployment, SitesmithError>;
}
