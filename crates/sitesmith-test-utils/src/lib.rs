// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sitesmith integration tests.
//!
//! Mock collaborators record what they were asked and answer from canned
//! data, so the whole pipeline runs without network access.
//!
//! # Components
//!
//! - [`MockTextGenerator`] - queued model answers
//! - [`MockImageSearch`] - photo provider with per-query delays
//! - [`MockContentGenerator`], [`MockSiteBuilder`] - pipeline steps
//! - [`MockRepoHost`], [`MockDeployer`], [`MockCrmRelay`] - outbound services
//! - [`TestHarness`] - store, orchestrator and gateway router wired together

pub mod fixtures;
pub mod harness;
pub mod mock_generators;
pub mod mock_services;

pub use fixtures::{sample_content, sample_request};
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_generators::{MockContentGenerator, MockImageSearch, MockSiteBuilder, MockTextGenerator};
pub use mock_services::{MockCrmRelay, MockDeployer, MockRepoHost};
