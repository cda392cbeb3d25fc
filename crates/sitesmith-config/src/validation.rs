// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! Every problem is collected so the operator sees all of them at once.

use reqwest::Url;

use crate::diagnostic::ConfigError;
use crate::model::SitesmithConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates a deserialized configuration.
pub fn validate_config(config: &SitesmithConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::invalid("server.host", "must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::invalid(
            "server.host",
            format!("`{host}` is not an IP address or hostname"),
        ));
    }

    if !LOG_LEVELS.contains(&config.server.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::invalid(
            "server.log_level",
            format!("expected one of {}", LOG_LEVELS.join(", ")),
        ));
    }

    if let Some(base) = &config.server.public_base_url {
        check_http_url(&mut errors, "server.public_base_url", base);
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::invalid("gemini.model", "must not be empty"));
    }
    non_zero(&mut errors, "gemini.timeout_secs", config.gemini.timeout_secs);

    non_zero(&mut errors, "images.timeout_ms", config.images.timeout_ms);
    if !(1..=4).contains(&config.images.max_queries) {
        errors.push(ConfigError::invalid(
            "images.max_queries",
            format!("must be between 1 and 4, got {}", config.images.max_queries),
        ));
    }

    if config.github.branch.trim().is_empty() {
        errors.push(ConfigError::invalid("github.branch", "must not be empty"));
    }

    if let Some(url) = &config.crm.contact_webhook_url {
        check_http_url(&mut errors, "crm.contact_webhook_url", url);
    }
    if let Some(url) = &config.crm.booking_webhook_url {
        check_http_url(&mut errors, "crm.booking_webhook_url", url);
    }
    check_http_url(&mut errors, "crm.base_url", &config.crm.base_url);

    non_zero(&mut errors, "jobs.retention_secs", config.jobs.retention_secs);
    non_zero(
        &mut errors,
        "jobs.sweep_interval_secs",
        config.jobs.sweep_interval_secs,
    );

    non_zero(
        &mut errors,
        "status.poll_interval_ms",
        config.status.poll_interval_ms,
    );
    non_zero(
        &mut errors,
        "status.max_stream_secs",
        config.status.max_stream_secs,
    );
    if config.status.poll_interval_ms >= config.status.max_stream_secs.saturating_mul(1000)
        && config.status.max_stream_secs > 0
    {
        errors.push(ConfigError::invalid(
            "status.poll_interval_ms",
            "must be shorter than status.max_stream_secs",
        ));
    }

    let limits = &config.rate_limit;
    non_zero(&mut errors, "rate_limit.submit_max", u64::from(limits.submit_max));
    non_zero(
        &mut errors,
        "rate_limit.submit_window_secs",
        limits.submit_window_secs,
    );
    non_zero(&mut errors, "rate_limit.contact_max", u64::from(limits.contact_max));
    non_zero(
        &mut errors,
        "rate_limit.contact_window_secs",
        limits.contact_window_secs,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn non_zero(errors: &mut Vec<ConfigError>, field: &str, value: u64) {
    if value == 0 {
        errors.push(ConfigError::invalid(field, "must be greater than zero"));
    }
}

fn check_http_url(errors: &mut Vec<ConfigError>, field: &str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ConfigError::invalid(
            field,
            format!("scheme `{}` is not http or https", url.scheme()),
        )),
        Err(e) => errors.push(ConfigError::invalid(field, format!("not a URL: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: &[ConfigError]) -> Vec<String> {
        errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::Validation { field, .. } => Some(field.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SitesmithConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let mut config = SitesmithConfig::default();
        config.server.host = "   ".into();
        config.jobs.retention_secs = 0;
        config.images.max_queries = 9;
        let errors = validate_config(&config).unwrap_err();
        let fields = fields(&errors);
        assert!(fields.contains(&"server.host".to_string()));
        assert!(fields.contains(&"jobs.retention_secs".to_string()));
        assert!(fields.contains(&"images.max_queries".to_string()));
    }

    #[test]
    fn rejects_non_http_webhook() {
        let mut config = SitesmithConfig::default();
        config.crm.contact_webhook_url = Some("ftp://example.com/hook".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(fields(&errors), vec!["crm.contact_webhook_url".to_string()]);
    }

    #[test]
    fn poll_interval_must_fit_in_stream_window() {
        let mut config = SitesmithConfig::default();
        config.status.max_stream_secs = 1;
        config.status.poll_interval_ms = 1000;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(fields(&errors), vec!["status.poll_interval_ms".to_string()]);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = SitesmithConfig::default();
        config.server.log_level = "loud".into();
        assert!(validate_config(&config).is_err());
    }
}
