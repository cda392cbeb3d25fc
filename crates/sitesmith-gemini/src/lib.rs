// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini text generation for the Sitesmith pipeline.
//!
//! [`GeminiProvider`] implements [`TextGenerator`] on top of
//! [`GeminiClient`]. JSON-mode requests set `responseMimeType` so the model
//! answers with a bare JSON document, though callers still clean the text.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use sitesmith_config::{SitesmithConfig, resolve_secret};
use sitesmith_core::traits::{GenerationRequest, ServiceAdapter, TextGenerator};
use sitesmith_core::types::{AdapterType, HealthStatus};
use sitesmith_core::SitesmithError;
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest, GenerationConfig};

/// Environment variable consulted when `gemini.api_key` is unset.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini-backed [`TextGenerator`].
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Builds the provider from configuration.
    ///
    /// The key comes from `gemini.api_key`, then `GEMINI_API_KEY`; neither
    /// being set is a configuration error.
    pub fn new(config: &SitesmithConfig) -> Result<Self, SitesmithError> {
        let api_key = resolve_api_key(&config.gemini.api_key)?;
        let client = GeminiClient::new(
            &api_key,
            config.gemini.model.clone(),
            Duration::from_secs(config.gemini.timeout_secs),
        )?;
        info!(model = %config.gemini.model, "Gemini provider initialized");
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }

    fn to_api_request(request: &GenerationRequest) -> GenerateContentRequest {
        let generation_config = GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
            response_mime_type: request
                .json_response
                .then(|| "application/json".to_string()),
        };
        GenerateContentRequest {
            contents: vec![Content::user(request.prompt.clone())],
            system_instruction: request.system.clone().map(Content::system),
            generation_config: generation_config.non_empty(),
        }
    }
}

#[async_trait]
impl ServiceAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::TextGenerator
    }

    async fn health_check(&self) -> Result<HealthStatus, SitesmithError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<String, SitesmithError> {
        let api_request = Self::to_api_request(&request);
        let response = self.client.generate_content(&api_request).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                model = self.client.model(),
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "gemini generation finished"
            );
        }

        match response.text() {
            Some(text) => Ok(text),
            None => {
                let reason = response
                    .prompt_feedback
                    .as_ref()
                    .and_then(|f| f.block_reason.clone())
                    .or_else(|| {
                        response
                            .candidates
                            .first()
                            .and_then(|c| c.finish_reason.clone())
                    })
                    .unwrap_or_else(|| "no candidates".to_string());
                warn!(reason = %reason, "Gemini returned no text");
                Err(SitesmithError::Provider {
                    message: format!("Gemini returned no text ({reason})"),
                    source: None,
                })
            }
        }
    }
}

fn resolve_api_key(configured: &Option<String>) -> Result<SecretString, SitesmithError> {
    resolve_secret(configured, API_KEY_ENV)
        .map(SecretString::from)
        .ok_or_else(|| {
            SitesmithError::Config(format!(
                "Gemini API key not found. Set gemini.api_key in config or the {API_KEY_ENV} environment variable."
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str) -> GeminiProvider {
        let client = GeminiClient::new(
            &SecretString::from("k".to_string()),
            "gemini-2.0-flash".into(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base_url);
        GeminiProvider::with_client(client)
    }

    #[test]
    fn api_key_from_config() {
        let key = resolve_api_key(&Some("AIza-test".into())).unwrap();
        assert_eq!(key.expose_secret(), "AIza-test");
    }

    #[test]
    fn json_request_sets_mime_type_and_system_instruction() {
        let request = GenerationRequest {
            system: Some("You are a designer.".into()),
            ..GenerationRequest::json("colors please")
        }
        .with_temperature(0.4);
        let api = GeminiProvider::to_api_request(&request);
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are a designer.");
        let temp = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.4).abs() < 1e-6);
    }

    #[test]
    fn plain_request_omits_generation_config() {
        let api = GeminiProvider::to_api_request(&GenerationRequest {
            prompt: "hello".into(),
            ..Default::default()
        });
        assert!(api.generation_config.is_none());
        assert!(api.system_instruction.is_none());
    }

    #[tokio::test]
    async fn generate_returns_model_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "{\"ok\":true}"}]}}]
            })))
            .mount(&server)
            .await;

        let text = provider(&server.uri())
            .generate(GenerationRequest::json("anything"))
            .await
            .unwrap();
        assert_eq!(text, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn blocked_prompt_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server.uri())
            .generate(GenerationRequest::json("anything"))
            .await
            .unwrap_err();
        assert!(matches!(err, SitesmithError::Provider { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn adapter_metadata() {
        let p = provider("http://localhost");
        assert_eq!(p.name(), "gemini");
        assert_eq!(p.adapter_type(), AdapterType::TextGenerator);
    }
}
