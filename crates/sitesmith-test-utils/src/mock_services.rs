// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mocks for repository hosting, deployment and the CRM.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use sitesmith_core::traits::{CrmRelay, Deployer, RepoHost, ServiceAdapter};
use sitesmith_core::types::{AdapterType, Deployment, RepoInfo, SiteFile};
use sitesmith_core::SitesmithError;

const MOCK_OWNER: &str = "sitesmith-test";

/// Records created repositories instead of calling GitHub.
pub struct MockRepoHost {
    fail: bool,
    next_id: AtomicU64,
    created: Mutex<Vec<(String, Vec<SiteFile>)>>,
}

impl MockRepoHost {
    pub fn new() -> Self {
        Self {
            fail: false,
            next_id: AtomicU64::new(1),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Rejects every repository like a name conflict would.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Names of the repositories created so far.
    pub async fn created(&self) -> Vec<String> {
        self.created.lock().await.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Files pushed to the named repository.
    pub async fn files_of(&self, name: &str) -> Option<Vec<SiteFile>> {
        self.created
            .lock()
            .await
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, files)| files.clone())
    }
}

impl Default for MockRepoHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockRepoHost {
    fn name(&self) -> &str {
        "mock-github"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RepoHost
    }
}

#[async_trait]
impl RepoHost for MockRepoHost {
    async fn create_repository(
        &self,
        name: &str,
        _description: &str,
        files: &[SiteFile],
    ) -> Result<RepoInfo, SitesmithError> {
        if self.fail {
            return Err(SitesmithError::Upstream {
                service: "github".into(),
                status: Some(422),
                body: "name already exists on this account".into(),
            });
        }
        self.created.lock().await.push((name.to_string(), files.to_vec()));
        Ok(RepoInfo {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            full_name: format!("{MOCK_OWNER}/{name}"),
            html_url: format!("https://github.com/{MOCK_OWNER}/{name}"),
            default_branch: "main".into(),
            commit_sha: format!("mock-sha-{}", files.len()),
        })
    }
}

/// Records deployments instead of calling Vercel.
pub struct MockDeployer {
    fail: bool,
    deployed: Mutex<Vec<String>>,
}

impl MockDeployer {
    pub fn new() -> Self {
        Self {
            fail: false,
            deployed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            deployed: Mutex::new(Vec::new()),
        }
    }

    /// Repository names deployed so far.
    pub async fn deployed(&self) -> Vec<String> {
        self.deployed.lock().await.clone()
    }
}

impl Default for MockDeployer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockDeployer {
    fn name(&self) -> &str {
        "mock-vercel"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Deployer
    }
}

#[async_trait]
impl Deployer for MockDeployer {
    async fn deploy(&self, repo: &RepoInfo) -> Result<Deployment, SitesmithError> {
        if self.fail {
            return Err(SitesmithError::Upstream {
                service: "vercel".into(),
                status: Some(403),
                body: "deployment quota exceeded".into(),
            });
        }
        self.deployed.lock().await.push(repo.name.clone());
        Ok(Deployment {
            id: format!("dpl_{}", repo.id),
            url: format!("https://{}.vercel.app", repo.name),
        })
    }
}

/// Records relayed submissions; can be scripted to fail like a webhook.
pub struct MockCrmRelay {
    failure: Option<(u16, String)>,
    contacts: Mutex<Vec<Value>>,
    bookings: Mutex<Vec<Value>>,
}

impl MockCrmRelay {
    pub fn new() -> Self {
        Self {
            failure: None,
            contacts: Mutex::new(Vec::new()),
            bookings: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an upstream error carrying `status` and `body`.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            failure: Some((status, body.into())),
            ..Self::new()
        }
    }

    pub async fn contacts(&self) -> Vec<Value> {
        self.contacts.lock().await.clone()
    }

    pub async fn bookings(&self) -> Vec<Value> {
        self.bookings.lock().await.clone()
    }

    fn check(&self) -> Result<(), SitesmithError> {
        match &self.failure {
            Some((status, body)) => Err(SitesmithError::Upstream {
                service: "crm".into(),
                status: Some(*status),
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for MockCrmRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockCrmRelay {
    fn name(&self) -> &str {
        "mock-crm"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Crm
    }
}

#[async_trait]
impl CrmRelay for MockCrmRelay {
    async fn forward_contact(&self, payload: Value) -> Result<Value, SitesmithError> {
        self.check()?;
        self.contacts.lock().await.push(payload);
        Ok(json!({ "success": true, "response": null }))
    }

    async fn forward_booking(&self, payload: Value) -> Result<Value, SitesmithError> {
        self.check()?;
        self.bookings.lock().await.push(payload);
        Ok(json!({ "success": true, "response": null }))
    }

    async fn free_slots(&self, start_date: &str, end_date: &str) -> Result<Value, SitesmithError> {
        self.check()?;
        let mut days = serde_json::Map::new();
        days.insert(
            start_date.to_string(),
            json!({ "slots": [format!("{start_date}T09:00:00Z"), format!("{start_date}T14:00:00Z")] }),
        );
        days.entry(end_date.to_string()).or_insert_with(|| json!({ "slots": [] }));
        Ok(Value::Object(days))
    }
}
