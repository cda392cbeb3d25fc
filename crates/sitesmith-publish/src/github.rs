// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GitHub repository creation through the REST contents API.
//!
//! The repository is created with `auto_init` so the branch exists, then each
//! file is committed with its own `PUT /contents/{path}` call. Files are
//! pushed sequentially because every commit moves the branch head.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sitesmith_core::traits::{RepoHost, ServiceAdapter};
use sitesmith_core::types::{AdapterType, RepoInfo, SiteFile};
use sitesmith_core::SitesmithError;
use tracing::{debug, info};

const API_BASE_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const SERVICE: &str = "github";

#[derive(Debug, Serialize)]
struct CreateRepoRequest<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    auto_init: bool,
    has_issues: bool,
    has_wiki: bool,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    id: u64,
    name: String,
    full_name: String,
    html_url: String,
    #[serde(default)]
    default_branch: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PutContentResponse {
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ExistingContent {
    sha: String,
}

/// Creates repositories and commits generated files.
pub struct GithubPublisher {
    client: reqwest::Client,
    base_url: String,
    owner: Option<String>,
    private: bool,
    branch: String,
}

impl GithubPublisher {
    pub fn new(token: &SecretString) -> Result<Self, SitesmithError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| SitesmithError::Config(format!("invalid GitHub token: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("sitesmith/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SitesmithError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            owner: None,
            private: false,
            branch: "main".to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Creates repositories under an organization instead of the token's user.
    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner.filter(|o| !o.trim().is_empty());
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn create_repo(&self, name: &str, description: &str) -> Result<RepoResponse, SitesmithError> {
        let path = match &self.owner {
            Some(org) => format!("/orgs/{org}/repos"),
            None => "/user/repos".to_string(),
        };
        let body = CreateRepoRequest {
            name,
            description,
            private: self.private,
            auto_init: true,
            has_issues: false,
            has_wiki: false,
        };

        let response = self
            .client
            .post(self.url(&path))
            .json(&body)
            .send()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))?;
        let response = check(response).await?;
        response
            .json()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))
    }

    /// Blob sha of an existing file on the branch, required to overwrite it.
    async fn existing_sha(&self, full_name: &str, path: &str) -> Result<Option<String>, SitesmithError> {
        let url = Url::parse_with_params(
            &self.url(&format!("/repos/{full_name}/contents/{path}")),
            &[("ref", self.branch.as_str())],
        )
        .map_err(|e| SitesmithError::Internal(format!("bad GitHub URL: {e}")))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let existing: ExistingContent = check(response)
            .await?
            .json()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))?;
        Ok(Some(existing.sha))
    }

    async fn put_file(
        &self,
        full_name: &str,
        file: &SiteFile,
        sha: Option<String>,
    ) -> Result<String, SitesmithError> {
        let body = PutContentRequest {
            message: format!("Add {}", file.path),
            content: STANDARD.encode(file.content.as_bytes()),
            branch: &self.branch,
            sha,
        };
        let response = self
            .client
            .put(self.url(&format!("/repos/{full_name}/contents/{}", file.path)))
            .json(&body)
            .send()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))?;
        let committed: PutContentResponse = check(response)
            .await?
            .json()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))?;
        Ok(committed.commit.sha)
    }
}

/// Turns a non-2xx response into [`SitesmithError::Upstream`].
async fn check(response: reqwest::Response) -> Result<reqwest::Response, SitesmithError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(SitesmithError::Upstream {
        service: SERVICE.into(),
        status: Some(status.as_u16()),
        body: response.text().await.unwrap_or_default(),
    })
}

#[async_trait]
impl ServiceAdapter for GithubPublisher {
    fn name(&self) -> &str {
        "github"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RepoHost
    }
}

#[async_trait]
impl RepoHost for GithubPublisher {
    async fn create_repository(
        &self,
        name: &str,
        description: &str,
        files: &[SiteFile],
    ) -> Result<RepoInfo, SitesmithError> {
        if files.is_empty() {
            return Err(SitesmithError::Content("no files to publish".into()));
        }

        let repo = self.create_repo(name, description).await?;
        info!(repo = %repo.full_name, files = files.len(), "repository created");

        let mut commit_sha = String::new();
        for file in files {
            // auto_init commits a README, which ours must replace.
            let sha = if file.path == "README.md" {
                self.existing_sha(&repo.full_name, &file.path).await?
            } else {
                None
            };
            commit_sha = self.put_file(&repo.full_name, file, sha).await?;
            debug!(path = %file.path, commit = %commit_sha, "file committed");
        }

        Ok(RepoInfo {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            html_url: repo.html_url,
            default_branch: repo.default_branch.unwrap_or_else(|| self.branch.clone()),
            commit_sha,
        })
    }
}
