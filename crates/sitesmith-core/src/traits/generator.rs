// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generative-AI text client trait.

use async_trait::async_trait;

use crate::error::SitesmithError;
use crate::traits::adapter::ServiceAdapter;

/// A single prompt sent to the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system: Option<String>,
    /// Ask the model for a JSON-only answer.
    pub json_response: bool,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// A JSON-mode request for the given prompt.
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_response: true,
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }
}

/// Text generation backed by a generative-AI model.
///
/// Implementations return the raw model text. Callers asking for JSON must
/// still strip incidental formatting and validate the shape before use.
#[async_trait]
pub trait TextGenerator: ServiceAdapter {
    async fn generate(&self, request: GenerationRequest) -> Result<String, SitesmithError>;
}
