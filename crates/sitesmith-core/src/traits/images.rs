// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stock-photo search trait.

use async_trait::async_trait;

use crate::error::SitesmithError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::ImageData;

/// Looks up at most one photo for a free-text query.
///
/// Callers bound the wait themselves; implementations do not time out on
/// their own beyond the HTTP client default.
#[async_trait]
pub trait ImageSearch: ServiceAdapter {
    async fn search(&self, query: &str) -> Result<Option<ImageData>, SitesmithError>;
}
