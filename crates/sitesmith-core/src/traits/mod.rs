// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the generation pipeline and the gateway.
//!
//! Every collaborator extends [`ServiceAdapter`] and uses `#[async_trait]`
//! so it can be held as `Arc<dyn Trait>` and swapped for mocks in tests.

pub mod adapter;
pub mod builder;
pub mod content;
pub mod crm;
pub mod generator;
pub mod images;
pub mod publish;

pub use adapter::ServiceAdapter;
pub use builder::{SiteBuildInput, SiteBuilder};
pub use content::ContentGenerator;
pub use crm::CrmRelay;
pub use generator::{GenerationRequest, TextGenerator};
pub use images::ImageSearch;
pub use publish::{Deployer, RepoHost};
