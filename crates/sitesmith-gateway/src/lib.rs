// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API for the website generator.
//!
//! - `POST /api/generate-website` accepts a request and returns a job id
//! - `GET /api/website-status` reports job progress as JSON or SSE
//! - `POST /api/contact`, `POST /api/booking`, `GET /api/calendar/slots`
//!   relay visitor submissions from generated sites to the CRM
//! - `GET /health`, `GET /metrics`

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod server;
pub mod sse;
pub mod status;

pub use error::ApiError;
pub use rate_limit::RateLimiter;
pub use server::{GatewayState, MetricsRender, StreamSettings, build_router, start_server};
