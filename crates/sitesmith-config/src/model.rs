// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a typo in
//! `sitesmith.toml` is reported at startup instead of silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Sitesmith configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SitesmithConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Generative-AI model settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Stock photo providers.
    #[serde(default)]
    pub images: ImagesConfig,

    /// Source hosting for generated sites.
    #[serde(default)]
    pub github: GithubConfig,

    /// Deployment of generated sites.
    #[serde(default)]
    pub vercel: VercelConfig,

    /// CRM webhook relays.
    #[serde(default)]
    pub crm: CrmConfig,

    /// Job store retention.
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Status endpoint streaming.
    #[serde(default)]
    pub status: StatusConfig,

    /// Per-client request limits.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Prometheus metrics.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory with the marketing site's static files, served for unknown paths.
    #[serde(default)]
    pub static_dir: Option<String>,

    /// Public origin used to build absolute status URLs (e.g. `https://example.com`).
    /// Relative URLs are returned when unset.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            static_dir: None,
            public_base_url: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for colors, template selection and copy.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_timeout() -> u64 {
    60
}

/// Stock photo provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImagesConfig {
    /// Unsplash access key (primary provider). Env fallback: `UNSPLASH_ACCESS_KEY`.
    #[serde(default)]
    pub unsplash_access_key: Option<String>,

    /// Pexels API key (fallback provider). Env fallback: `PEXELS_API_KEY`.
    #[serde(default)]
    pub pexels_api_key: Option<String>,

    /// Budget for a single provider lookup.
    #[serde(default = "default_image_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of search terms looked up per job.
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            unsplash_access_key: None,
            pexels_api_key: None,
            timeout_ms: default_image_timeout_ms(),
            max_queries: default_max_queries(),
        }
    }
}

fn default_image_timeout_ms() -> u64 {
    5000
}

fn default_max_queries() -> usize {
    2
}

/// GitHub configuration for publishing generated sites.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GithubConfig {
    /// Personal access token. Env fallback: `GITHUB_TOKEN`.
    #[serde(default)]
    pub token: Option<String>,

    /// Organization to create repositories in. `None` uses the token's user.
    #[serde(default)]
    pub owner: Option<String>,

    /// Create private repositories.
    #[serde(default)]
    pub private: bool,

    /// Branch receiving the generated files.
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            owner: None,
            private: false,
            branch: default_branch(),
        }
    }
}

fn default_branch() -> String {
    "main".to_string()
}

/// Vercel deployment configuration. Deployment is skipped without a token.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VercelConfig {
    /// API token. Env fallback: `VERCEL_TOKEN`.
    #[serde(default)]
    pub token: Option<String>,

    /// Team scope for deployments.
    #[serde(default)]
    pub team_id: Option<String>,
}

/// CRM relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CrmConfig {
    /// Webhook receiving contact form submissions.
    #[serde(default)]
    pub contact_webhook_url: Option<String>,

    /// Webhook receiving booking requests.
    #[serde(default)]
    pub booking_webhook_url: Option<String>,

    /// API key for calendar lookups. Env fallback: `CRM_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Calendar whose free slots are exposed.
    #[serde(default)]
    pub calendar_id: Option<String>,

    /// CRM API origin.
    #[serde(default = "default_crm_base_url")]
    pub base_url: String,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            contact_webhook_url: None,
            booking_webhook_url: None,
            api_key: None,
            calendar_id: None,
            base_url: default_crm_base_url(),
        }
    }
}

fn default_crm_base_url() -> String {
    "https://services.leadconnectorhq.com".to_string()
}

/// Job store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JobsConfig {
    /// Jobs older than this are removed by the sweeper.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    /// How often the sweeper runs.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Keep queued/processing jobs past the retention window.
    #[serde(default)]
    pub preserve_in_flight: bool,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            preserve_in_flight: false,
        }
    }
}

fn default_retention_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    300
}

/// Status endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StatusConfig {
    /// Interval between store re-reads while streaming.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Streams are closed after this long even if the job is still running.
    #[serde(default = "default_max_stream_secs")]
    pub max_stream_secs: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_stream_secs: default_max_stream_secs(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_stream_secs() -> u64 {
    300
}

/// Per-client rate limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Generation submissions allowed per window.
    #[serde(default = "default_submit_max")]
    pub submit_max: u32,

    #[serde(default = "default_submit_window_secs")]
    pub submit_window_secs: u64,

    /// Contact/booking submissions allowed per window.
    #[serde(default = "default_contact_max")]
    pub contact_max: u32,

    #[serde(default = "default_contact_window_secs")]
    pub contact_window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            submit_max: default_submit_max(),
            submit_window_secs: default_submit_window_secs(),
            contact_max: default_contact_max(),
            contact_window_secs: default_contact_window_secs(),
        }
    }
}

fn default_submit_max() -> u32 {
    5
}

fn default_submit_window_secs() -> u64 {
    3600
}

fn default_contact_max() -> u32 {
    10
}

fn default_contact_window_secs() -> u64 {
    600
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrometheusConfig {
    /// Expose `/metrics`.
    #[serde(default = "default_prometheus_enabled")]
    pub enabled: bool,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            enabled: default_prometheus_enabled(),
        }
    }
}

fn default_prometheus_enabled() -> bool {
    true
}

/// Resolves a secret from config first, then from the named environment variable.
///
/// Empty strings count as unset.
pub fn resolve_secret(configured: &Option<String>, env_var: &str) -> Option<String> {
    configured
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            std::env::var(env_var)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SitesmithConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.images.max_queries, 2);
        assert_eq!(config.images.timeout_ms, 5000);
        assert_eq!(config.jobs.retention_secs, 3600);
        assert!(!config.jobs.preserve_in_flight);
        assert_eq!(config.status.max_stream_secs, 300);
        assert_eq!(config.github.branch, "main");
        assert!(config.vercel.token.is_none());
        assert!(config.prometheus.enabled);
    }

    #[test]
    fn configured_secret_wins_over_env() {
        let configured = Some("from-config".to_string());
        assert_eq!(
            resolve_secret(&configured, "SITESMITH_TEST_UNSET_VARIABLE").as_deref(),
            Some("from-config")
        );
    }

    #[test]
    fn blank_secret_counts_as_unset() {
        let configured = Some("   ".to_string());
        assert_eq!(resolve_secret(&configured, "SITESMITH_TEST_UNSET_VARIABLE"), None);
    }

    #[test]
    fn unknown_section_key_is_rejected() {
        let toml_str = "[jobs]\nretention = 10\n";
        assert!(toml::from_str::<SitesmithConfig>(toml_str).is_err());
    }
}
