// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stock photos for generated sites.
//!
//! Unsplash is tried first and Pexels second. Providers without credentials
//! are left out, so a deployment with no keys simply renders without photos.

pub mod fetcher;
pub mod pexels;
pub mod unsplash;

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use sitesmith_config::{SitesmithConfig, resolve_secret};
use sitesmith_core::traits::ImageSearch;
use sitesmith_core::SitesmithError;
use tracing::info;

pub use fetcher::ImageFetcher;
pub use pexels::PexelsClient;
pub use unsplash::UnsplashClient;

/// Builds the fetcher from `[images]`, with env fallbacks for the keys.
pub fn fetcher_from_config(config: &SitesmithConfig) -> Result<ImageFetcher, SitesmithError> {
    let images = &config.images;

    let primary = resolve_secret(&images.unsplash_access_key, "UNSPLASH_ACCESS_KEY")
        .map(|key| UnsplashClient::new(&SecretString::from(key)))
        .transpose()?
        .map(|c| Arc::new(c) as Arc<dyn ImageSearch>);
    let fallback = resolve_secret(&images.pexels_api_key, "PEXELS_API_KEY")
        .map(|key| PexelsClient::new(&SecretString::from(key)))
        .transpose()?
        .map(|c| Arc::new(c) as Arc<dyn ImageSearch>);

    info!(
        unsplash = primary.is_some(),
        pexels = fallback.is_some(),
        "image providers configured"
    );

    Ok(ImageFetcher::new(
        primary,
        fallback,
        Duration::from_millis(images.timeout_ms),
        images.max_queries,
    ))
}
