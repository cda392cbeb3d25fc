// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation jobs: the in-memory [`JobStore`] and the [`JobOrchestrator`]
//! that drives a job from `queued` to `completed` or `failed`.

pub mod orchestrator;
pub mod store;

pub use orchestrator::{JobOrchestrator, Pipeline};
pub use store::JobStore;
