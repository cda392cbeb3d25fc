// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sitesmith check-config` summary.
//!
//! Secrets are never printed: each one is reported as `set (config)`,
//! `set (env)` or `unset`.

use sitesmith_config::SitesmithConfig;

fn secret(configured: &Option<String>, env_var: &str) -> String {
    let in_config = configured.as_deref().is_some_and(|s| !s.trim().is_empty());
    let in_env = std::env::var(env_var).is_ok_and(|s| !s.trim().is_empty());
    match (in_config, in_env) {
        (true, _) => "set (config)".to_string(),
        (false, true) => format!("set (env {env_var})"),
        (false, false) => "unset".to_string(),
    }
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

/// Key/value lines describing the effective configuration.
pub fn summary(config: &SitesmithConfig) -> Vec<(&'static str, String)> {
    vec![
        ("server.listen", format!("{}:{}", config.server.host, config.server.port)),
        ("server.log_level", config.server.log_level.clone()),
        ("server.static_dir", optional(&config.server.static_dir)),
        ("server.public_base_url", optional(&config.server.public_base_url)),
        ("gemini.model", config.gemini.model.clone()),
        ("gemini.api_key", secret(&config.gemini.api_key, "GEMINI_API_KEY")),
        (
            "images.unsplash_access_key",
            secret(&config.images.unsplash_access_key, "UNSPLASH_ACCESS_KEY"),
        ),
        ("images.pexels_api_key", secret(&config.images.pexels_api_key, "PEXELS_API_KEY")),
        ("github.token", secret(&config.github.token, "GITHUB_TOKEN")),
        ("github.owner", optional(&config.github.owner)),
        ("vercel.token", secret(&config.vercel.token, "VERCEL_TOKEN")),
        ("crm.contact_webhook_url", optional(&config.crm.contact_webhook_url)),
        ("crm.booking_webhook_url", optional(&config.crm.booking_webhook_url)),
        ("crm.api_key", secret(&config.crm.api_key, "CRM_API_KEY")),
        ("jobs.retention_secs", config.jobs.retention_secs.to_string()),
        ("prometheus.enabled", config.prometheus.enabled.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_redacted() {
        let mut config = SitesmithConfig::default();
        config.github.token = Some("ghp_supersecret".into());
        config.github.owner = Some("acme".into());

        let lines = summary(&config);
        assert!(lines.iter().all(|(_, v)| !v.contains("ghp_supersecret")));

        let token = lines.iter().find(|(k, _)| *k == "github.token").unwrap();
        assert_eq!(token.1, "set (config)");
        let owner = lines.iter().find(|(k, _)| *k == "github.owner").unwrap();
        assert_eq!(owner.1, "acme");
    }

    #[test]
    fn blank_secret_is_not_reported_as_set() {
        assert_eq!(
            secret(&Some("  ".into()), "SITESMITH_TEST_UNSET_VARIABLE"),
            "unset"
        );
    }
}
