// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sitesmith website generator.

use thiserror::Error;

/// The primary error type used across all Sitesmith crates.
#[derive(Debug, Error)]
pub enum SitesmithError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request validation errors, rejected before any side effect.
    #[error("validation error: {0}")]
    Validation(String),

    /// Generative-AI provider errors (API failure, blocked prompt, empty answer).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A third-party HTTP API answered with a non-success status or could not be reached.
    #[error("{service} request failed{}: {body}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream {
        service: String,
        status: Option<u16>,
        body: String,
    },

    /// Model output that could not be turned into usable site content.
    #[error("content error: {0}")]
    Content(String),

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SitesmithError {
    /// Builds an [`Upstream`](SitesmithError::Upstream) error for a transport failure
    /// (no HTTP status was received).
    pub fn transport(service: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SitesmithError::Upstream {
            service: service.into(),
            status: None,
            body: err.to_string(),
        }
    }
}
