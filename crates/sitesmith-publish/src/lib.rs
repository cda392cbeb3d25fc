// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publishing generated sites: a GitHub repository per job and an optional
//! Vercel deployment of that repository.

pub mod github;
pub mod pipeline;
pub mod vercel;

use std::sync::Arc;

use secrecy::SecretString;
use sitesmith_config::{SitesmithConfig, resolve_secret};
use sitesmith_core::traits::Deployer;
use sitesmith_core::SitesmithError;
use tracing::info;

pub use github::GithubPublisher;
pub use pipeline::{PublishPipeline, repo_name};
pub use vercel::VercelDeployer;

pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const VERCEL_TOKEN_ENV: &str = "VERCEL_TOKEN";

/// Builds the GitHub publisher from `[github]`. A token is required.
pub fn github_from_config(config: &SitesmithConfig) -> Result<GithubPublisher, SitesmithError> {
    let github = &config.github;
    let token = resolve_secret(&github.token, GITHUB_TOKEN_ENV).ok_or_else(|| {
        SitesmithError::Config(format!(
            "GitHub token not configured: set github.token or {GITHUB_TOKEN_ENV}"
        ))
    })?;
    Ok(GithubPublisher::new(&SecretString::from(token))?
        .with_owner(github.owner.clone())
        .with_private(github.private)
        .with_branch(github.branch.clone()))
}

/// Builds the Vercel deployer from `[vercel]`, or `None` without a token.
pub fn vercel_from_config(config: &SitesmithConfig) -> Result<Option<VercelDeployer>, SitesmithError> {
    let Some(token) = resolve_secret(&config.vercel.token, VERCEL_TOKEN_ENV) else {
        info!("vercel token not configured, deployments disabled");
        return Ok(None);
    };
    Ok(Some(
        VercelDeployer::new(&SecretString::from(token))?.with_team_id(config.vercel.team_id.clone()),
    ))
}

/// Assembles the full publishing pipeline from configuration.
pub fn pipeline_from_config(config: &SitesmithConfig) -> Result<PublishPipeline, SitesmithError> {
    let host = Arc::new(github_from_config(config)?);
    let deployer = vercel_from_config(config)?.map(|d| Arc::new(d) as Arc<dyn Deployer>);
    Ok(PublishPipeline::new(host, deployer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn github_token_from_config_is_accepted() {
        let mut config = SitesmithConfig::default();
        config.github.token = Some("ghp_config".into());
        config.github.owner = Some("acme".into());
        assert!(github_from_config(&config).is_ok());
    }

    #[test]
    #[serial_test::serial]
    fn vercel_is_optional() {
        // SAFETY: serialized with the other env-reading tests in this module.
        unsafe { std::env::remove_var(VERCEL_TOKEN_ENV) };
        let config = SitesmithConfig::default();
        assert!(vercel_from_config(&config).unwrap().is_none());
    }

    #[test]
    #[serial_test::serial]
    fn missing_github_token_is_config_error() {
        // SAFETY: serialized with the other env-reading tests in this module.
        unsafe { std::env::remove_var(GITHUB_TOKEN_ENV) };
        let err = github_from_config(&SitesmithConfig::default()).err().unwrap();
        assert!(matches!(err, SitesmithError::Config(_)));
    }
}
