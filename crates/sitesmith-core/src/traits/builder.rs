// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static site file builder trait.

use async_trait::async_trait;

use crate::error::SitesmithError;
use crate::template::TemplateId;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{ColorPalette, ImageData, SiteContent, SiteFile, WebsiteRequest};

/// Everything the builder needs to render a site.
#[derive(Debug, Clone, Copy)]
pub struct SiteBuildInput<'a> {
    pub request: &'a WebsiteRequest,
    pub template: TemplateId,
    pub palette: &'a ColorPalette,
    pub content: &'a SiteContent,
    /// One entry per image query; `None` where no photo was found.
    pub images: &'a [Option<ImageData>],
}

/// Renders template + content + colors + images into static files.
#[async_trait]
pub trait SiteBuilder: ServiceAdapter {
    async fn build(&self, input: SiteBuildInput<'_>) -> Result<Vec<SiteFile>, SitesmithError>;
}
