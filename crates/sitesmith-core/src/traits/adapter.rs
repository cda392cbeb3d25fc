// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that all collaborator adapters implement.

use async_trait::async_trait;

use crate::error::SitesmithError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and health of an adapter wired into the pipeline.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Human-readable name of this adapter instance ("gemini", "unsplash").
    fn name(&self) -> &str;

    /// Which collaborator role this adapter fills.
    fn adapter_type(&self) -> AdapterType;

    /// Reports whether the adapter can currently serve requests.
    async fn health_check(&self) -> Result<HealthStatus, SitesmithError> {
        Ok(HealthStatus::Healthy)
    }
}
