// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sitesmith website generator.
//!
//! This crate provides the error type, the domain types (jobs, palettes,
//! images, generated content) and the collaborator traits that the pipeline
//! is assembled from. Every adapter crate implements traits defined here.

pub mod error;
pub mod template;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SitesmithError;
pub use template::TemplateId;
pub use types::{AdapterType, HealthStatus, Job, JobPatch, JobStatus};

pub use traits::{
    ContentGenerator, CrmRelay, Deployer, ImageSearch, RepoHost, ServiceAdapter, SiteBuilder,
    TextGenerator,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips_through_display() {
        use std::str::FromStr;

        let variants = [
            AdapterType::TextGenerator,
            AdapterType::ImageSearch,
            AdapterType::ContentGenerator,
            AdapterType::SiteBuilder,
            AdapterType::RepoHost,
            AdapterType::Deployer,
            AdapterType::Crm,
        ];
        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
        assert_eq!(AdapterType::RepoHost.to_string(), "repo_host");
    }

    #[test]
    fn all_traits_are_object_safe() {
        fn _text(_: &dyn TextGenerator) {}
        fn _images(_: &dyn ImageSearch) {}
        fn _content(_: &dyn ContentGenerator) {}
        fn _builder(_: &dyn SiteBuilder) {}
        fn _repo(_: &dyn RepoHost) {}
        fn _deploy(_: &dyn Deployer) {}
        fn _crm(_: &dyn CrmRelay) {}
    }

    #[test]
    fn health_status_variants() {
        assert_eq!(HealthStatus::Healthy, HealthStatus::Healthy);
        assert_ne!(HealthStatus::Degraded("slow".into()), HealthStatus::Healthy);
    }
}
