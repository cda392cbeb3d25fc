// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unsplash photo search.

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sitesmith_core::traits::{ImageSearch, ServiceAdapter};
use sitesmith_core::types::{AdapterType, ImageData, ImageProvider};
use sitesmith_core::SitesmithError;
use tracing::debug;

const API_BASE_URL: &str = "https://api.unsplash.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    alt_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
    urls: PhotoUrls,
    user: PhotoUser,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: String,
    #[serde(default)]
    links: Option<UserLinks>,
}

#[derive(Debug, Deserialize)]
struct UserLinks {
    html: Option<String>,
}

/// Primary stock photo provider.
pub struct UnsplashClient {
    client: reqwest::Client,
    base_url: String,
}

impl UnsplashClient {
    pub fn new(access_key: &SecretString) -> Result<Self, SitesmithError> {
        let mut auth = HeaderValue::from_str(&format!("Client-ID {}", access_key.expose_secret()))
            .map_err(|e| SitesmithError::Config(format!("invalid Unsplash access key: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", auth);
        headers.insert("accept-version", HeaderValue::from_static("v1"));

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
impl ServiceAdapter for UnsplashClient {
    fn name(&self) -> &str {
        "unsplash"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ImageSearch
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search(&self, query: &str) -> Result<Option<ImageData>, SitesmithError> {
        let url = Url::parse_with_params(
            &format!("{}/search/photos", self.base_url.trim_end_matches('/')),
            &[("query", query), ("per_page", "1"), ("orientation", "landscape")],
        )
        .map_err(|e| SitesmithError::Internal(format!("bad Unsplash URL: {e}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SitesmithError::transport("unsplash", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitesmithError::Upstream {
                service: "unsplash".into(),
                status: Some(status.as_u16()),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SitesmithError::transport("unsplash", e))?;
        debug!(query, results = body.results.len(), "unsplash search finished");

        Ok(body.results.into_iter().next().map(|photo| ImageData {
            url: photo.urls.regular,
            alt: photo
                .alt_description
                .or(photo.description)
                .unwrap_or_else(|| query.to_string()),
            photographer: photo.user.name,
            photographer_url: photo.user.links.and_then(|l| l.html),
            source: ImageProvider::Unsplash,
        }))
    }
}
