// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vercel deployments from a GitHub git source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sitesmith_core::traits::{Deployer, ServiceAdapter};
use sitesmith_core::types::{AdapterType, Deployment, RepoInfo};
use sitesmith_core::SitesmithError;
use tracing::info;

const API_BASE_URL: &str = "https://api.vercel.com";
const SERVICE: &str = "vercel";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentRequest<'a> {
    name: &'a str,
    target: &'a str,
    git_source: GitSource<'a>,
    project_settings: ProjectSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GitSource<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    repo_id: u64,
    #[serde(rename = "ref")]
    git_ref: &'a str,
    sha: &'a str,
}

/// Plain static output: no framework detection, no build step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSettings {
    framework: Option<String>,
    build_command: Option<String>,
    output_directory: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeploymentResponse {
    id: String,
    url: String,
}

/// Triggers production deployments of published repositories.
pub struct VercelDeployer {
    client: reqwest::Client,
    base_url: String,
    team_id: Option<String>,
}

impl VercelDeployer {
    pub fn new(token: &SecretString) -> Result<Self, SitesmithError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| SitesmithError::Config(format!("invalid Vercel token: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SitesmithError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            team_id: None,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_team_id(mut self, team_id: Option<String>) -> Self {
        self.team_id = team_id.filter(|t| !t.trim().is_empty());
        self
    }

    fn deployments_url(&self) -> Result<Url, SitesmithError> {
        let base = format!("{}/v13/deployments", self.base_url.trim_end_matches('/'));
        let parsed = match &self.team_id {
            Some(team) => Url::parse_with_params(&base, &[("teamId", team.as_str())]),
            None => Url::parse(&base),
        };
        parsed.map_err(|e| SitesmithError::Internal(format!("bad Vercel URL: {e}")))
    }
}

#[async_trait]
impl ServiceAdapter for VercelDeployer {
    fn name(&self) -> &str {
        "vercel"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Deployer
    }
}

#[async_trait]
impl Deployer for VercelDeployer {
    async fn deploy(&self, repo: &RepoInfo) -> Result<Deployment, SitesmithError> {
        let body = DeploymentRequest {
            name: &repo.name,
            target: "production",
            git_source: GitSource {
                kind: "github",
                repo_id: repo.id,
                git_ref: &repo.default_branch,
                sha: &repo.commit_sha,
            },
            project_settings: ProjectSettings {
                framework: None,
                build_command: None,
                output_directory: None,
            },
        };

        let response = self
            .client
            .post(self.deployments_url()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitesmithError::Upstream {
                service: SERVICE.into(),
                status: Some(status.as_u16()),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let deployment: DeploymentResponse = response
            .json()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))?;
        let url = if deployment.url.starts_with("http://") || deployment.url.starts_with("https://")
        {
            deployment.url
        } else {
            format!("https://{}", deployment.url)
        };
        info!(repo = %repo.full_name, deployment = %deployment.id, %url, "deployment created");

        Ok(Deployment {
            id: deployment.id,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo() -> RepoInfo {
        RepoInfo {
            id: 42,
            name: "rosas-kitchen-1a2b3c4d".into(),
            full_name: "acme/rosas-kitchen-1a2b3c4d".into(),
            html_url: "https://github.com/acme/rosas-kitchen-1a2b3c4d".into(),
            default_branch: "main".into(),
            commit_sha: "abc123".into(),
        }
    }

    fn deployer(uri: &str) -> VercelDeployer {
        VercelDeployer::new(&SecretString::from("vc_test".to_string()))
            .unwrap()
            .with_base_url(uri)
    }

    #[tokio::test]
    async fn deploys_git_source_and_prefixes_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v13/deployments"))
            .and(header("authorization", "Bearer vc_test"))
            .and(body_partial_json(serde_json::json!({
                "target": "production",
                "gitSource": {"type": "github", "repoId": 42, "ref": "main", "sha": "abc123"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "dpl_1",
                "url": "rosas-kitchen.vercel.app",
                "readyState": "QUEUED"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let deployment = deployer(&server.uri()).deploy(&repo()).await.unwrap();
        assert_eq!(deployment.id, "dpl_1");
        assert_eq!(deployment.url, "https://rosas-kitchen.vercel.app");
    }

    #[tokio::test]
    async fn team_id_is_sent_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v13/deployments"))
            .and(query_param("teamId", "team_9"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "dpl_2", "url": "x.vercel.app"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        deployer(&server.uri())
            .with_team_id(Some("team_9".into()))
            .deploy(&repo())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_deployment_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;
        let err = deployer(&server.uri()).deploy(&repo()).await.unwrap_err();
        assert!(matches!(err, SitesmithError::Upstream { status: Some(403), .. }));
    }
}
