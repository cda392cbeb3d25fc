// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! [`GeminiClient`] owns authentication, request construction and a single
//! retry on transient statuses.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use sitesmith_core::SitesmithError;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Public Gemini API origin.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    max_retries: u32,
    base_url: String,
}

impl GeminiClient {
    /// Builds a client for `model` that gives up on a request after `timeout`.
    pub fn new(
        api_key: &SecretString,
        model: String,
        timeout: Duration,
    ) -> Result<Self, SitesmithError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| SitesmithError::Config(format!("invalid Gemini API key: {e}")))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SitesmithError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Points the client at another origin (wiremock in tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Sends one `generateContent` call.
    ///
    /// 429, 500, 503 and 529 are retried once after a one second pause.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, SitesmithError> {
        let url = self.endpoint();
        let mut attempt = 0;

        loop {
            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| SitesmithError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, model = %self.model, "gemini response received");

            if status.is_success() {
                return response
                    .json::<GenerateContentResponse>()
                    .await
                    .map_err(|e| SitesmithError::Provider {
                        message: format!("failed to parse Gemini response: {e}"),
                        source: Some(Box::new(e)),
                    });
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient Gemini error, will retry");
                attempt += 1;
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }

            return Err(SitesmithError::Provider {
                message: describe_failure(status, &body),
                source: None,
            });
        }
    }
}

fn describe_failure(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api) => format!(
            "Gemini API error ({} {}): {}",
            api.error.code, api.error.status, api.error.message
        ),
        Err(_) => format!("Gemini API returned {status}: {body}"),
    }
}

fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}
