// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pexels photo search, used when Unsplash has nothing.

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sitesmith_core::traits::{ImageSearch, ServiceAdapter};
use sitesmith_core::types::{AdapterType, ImageData, ImageProvider};
use sitesmith_core::SitesmithError;
use tracing::debug;

const API_BASE_URL: &str = "https://api.pexels.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    alt: Option<String>,
    photographer: String,
    #[serde(default)]
    photographer_url: Option<String>,
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    large: String,
    #[serde(default)]
    landscape: Option<String>,
}

pub struct PexelsClient {
    client: reqwest::Client,
    base_url: String,
}

impl PexelsClient {
    pub fn new(api_key: &SecretString) -> Result<Self, SitesmithError> {
        let mut auth = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| SitesmithError::Config(format!("invalid Pexels API key: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SitesmithError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl ServiceAdapter for PexelsClient {
    fn name(&self) -> &str {
        "pexels"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ImageSearch
    }
}

#[async_trait]
impl ImageSearch for PexelsClient {
    async fn search(&self, query: &str) -> Result<Option<ImageData>, SitesmithError> {
        let url = Url::parse_with_params(
            &format!("{}/v1/search", self.base_url.trim_end_matches('/')),
            &[("query", query), ("per_page", "1")],
        )
        .map_err(|e| SitesmithError::Internal(format!("bad Pexels URL: {e}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SitesmithError::transport("pexels", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitesmithError::Upstream {
                service: "pexels".into(),
                status: Some(status.as_u16()),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SitesmithError::transport("pexels", e))?;
        debug!(query, results = body.photos.len(), "pexels search finished");

        Ok(body.photos.into_iter().next().map(|photo| ImageData {
            url: photo.src.landscape.unwrap_or(photo.src.large),
            alt: photo
                .alt
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| query.to_string()),
            photographer: photo.photographer,
            photographer_url: photo.photographer_url,
            source: ImageProvider::Pexels,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn maps_first_photo() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("query", "bakery"))
            .and(query_param("per_page", "1"))
            .and(header("authorization", "px-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "photos": [{
                    "id": 7,
                    "alt": "",
                    "photographer": "Ben",
                    "photographer_url": "https://www.pexels.com/@ben",
                    "src": {"large": "https://images.pexels.com/7-large", "landscape": "https://images.pexels.com/7-land"}
                }]
            })))
            .mount(&server)
            .await;

        let client = PexelsClient::new(&SecretString::from("px-key".to_string()))
            .unwrap()
            .with_base_url(server.uri());
        let image = client.search("bakery").await.unwrap().unwrap();
        assert_eq!(image.url, "https://images.pexels.com/7-land");
        assert_eq!(image.alt, "bakery");
        assert_eq!(image.attribution(), "Photo by Ben on Pexels");
    }
}
