// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Later layers override earlier ones:
//! compiled defaults, `/etc/sitesmith/sitesmith.toml`,
//! `<config dir>/sitesmith/sitesmith.toml`, `./sitesmith.toml`, then
//! `SITESMITH_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SitesmithConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/sitesmith/sitesmith.toml";
pub(crate) const LOCAL_CONFIG: &str = "sitesmith.toml";

/// Top-level sections, used to turn `SITESMITH_JOBS_RETENTION_SECS` into
/// `jobs.retention_secs`. Longer names that share a prefix must come first.
const SECTIONS: &[&str] = &[
    "rate_limit",
    "prometheus",
    "server",
    "gemini",
    "images",
    "github",
    "vercel",
    "status",
    "jobs",
    "crm",
];

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sitesmith").join("sitesmith.toml"))
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(SitesmithConfig::default()))
}

/// The full figment before extraction, for callers that want metadata.
pub fn build_figment() -> Figment {
    let mut figment = defaults().merge(Toml::file(SYSTEM_CONFIG));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG)).merge(env_provider())
}

/// Loads from the standard file hierarchy plus environment overrides.
pub fn load_config() -> Result<SitesmithConfig, figment::Error> {
    build_figment().extract()
}

/// Loads defaults overlaid with an inline TOML document. No env overrides.
pub fn load_config_from_str(toml_content: &str) -> Result<SitesmithConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// Loads one explicit file plus environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<SitesmithConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

fn env_provider() -> Env {
    Env::prefixed("SITESMITH_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped env key onto its lowercase dotted config path.
///
/// figment hands keys over in their original case (`JOBS_RETENTION_SECS`).
/// Splitting on every `_` would break keys like `retention_secs`, so only
/// the leading section name is turned into a dot.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_keep_underscores_after_section() {
        assert_eq!(map_env_key("jobs_retention_secs"), "jobs.retention_secs");
        assert_eq!(map_env_key("rate_limit_submit_max"), "rate_limit.submit_max");
        assert_eq!(
            map_env_key("crm_contact_webhook_url"),
            "crm.contact_webhook_url"
        );
        assert_eq!(map_env_key("server_port"), "server.port");
    }

    #[test]
    fn uppercase_env_keys_are_lowercased() {
        assert_eq!(map_env_key("JOBS_RETENTION_SECS"), "jobs.retention_secs");
        assert_eq!(map_env_key("RATE_LIMIT_SUBMIT_MAX"), "rate_limit.submit_max");
        assert_eq!(map_env_key("Server_Port"), "server.port");
    }

    #[test]
    fn unknown_env_sections_pass_through() {
        assert_eq!(map_env_key("nonsense_value"), "nonsense_value");
    }

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
