// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page copy generation trait.

use async_trait::async_trait;

use crate::error::SitesmithError;
use crate::template::TemplateId;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{ColorPalette, SiteContent, WebsiteRequest};

/// Produces the copy for every requested page of a site.
#[async_trait]
pub trait ContentGenerator: ServiceAdapter {
    async fn generate(
        &self,
        request: &WebsiteRequest,
        template: TemplateId,
        palette: &ColorPalette,
    ) -> Result<SiteContent, SitesmithError>;
}
