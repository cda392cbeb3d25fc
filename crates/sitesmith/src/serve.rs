// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sitesmith serve` command implementation.
//!
//! Wires the Gemini text generator, stock photo providers, the static site
//! builder, GitHub/Vercel publishing and the CRM relay into a job
//! orchestrator, then serves the gateway until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use sitesmith_config::SitesmithConfig;
use sitesmith_core::SitesmithError;
use sitesmith_core::traits::{ContentGenerator, CrmRelay, SiteBuilder, TextGenerator};
use sitesmith_design::AiContentGenerator;
use sitesmith_gateway::{GatewayState, MetricsRender, build_router, start_server};
use sitesmith_gemini::GeminiProvider;
use sitesmith_jobs::{JobOrchestrator, JobStore, Pipeline};
use sitesmith_prometheus::PrometheusExporter;
use sitesmith_site::StaticSiteBuilder;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the server until SIGINT/SIGTERM.
pub async fn run_serve(config: SitesmithConfig) -> Result<(), SitesmithError> {
    init_tracing(&config.server.log_level);
    info!(version = env!("CARGO_PKG_VERSION"), "starting sitesmith");

    let metrics: Option<MetricsRender> = if config.prometheus.enabled {
        let exporter = PrometheusExporter::new()?;
        Some(Arc::new(move || exporter.render()))
    } else {
        info!("prometheus metrics disabled");
        None
    };

    let text: Arc<dyn TextGenerator> = Arc::new(GeminiProvider::new(&config)?);
    let content: Arc<dyn ContentGenerator> = Arc::new(AiContentGenerator::new(Arc::clone(&text)));
    let images = sitesmith_images::fetcher_from_config(&config)?;
    let builder: Arc<dyn SiteBuilder> = Arc::new(site_builder(&config));
    let publisher = sitesmith_publish::pipeline_from_config(&config)?;
    if !publisher.has_deployer() {
        warn!("no Vercel token configured, sites will be published without deployment");
    }

    let store = Arc::new(JobStore::from_config(&config.jobs));
    let orchestrator = Arc::new(JobOrchestrator::new(
        Arc::clone(&store),
        Pipeline {
            text,
            content,
            images,
            builder,
            publisher,
        },
    ));

    let cancel = shutdown::install_signal_handler();
    let sweeper = store.spawn_sweeper(
        Duration::from_secs(config.jobs.sweep_interval_secs),
        cancel.clone(),
    );
    info!(
        retention_secs = config.jobs.retention_secs,
        interval_secs = config.jobs.sweep_interval_secs,
        "job sweeper started"
    );

    let mut state = GatewayState::new(Arc::clone(&store), orchestrator, &config);
    if let Some(crm) = crm_relay(&config)? {
        state = state.with_crm(crm);
    }
    if let Some(render) = metrics {
        state = state.with_metrics(render);
    }

    let pruner = state.spawn_limiter_pruner(limiter_prune_interval(&config), cancel.clone());

    let router = build_router(state, config.server.static_dir.as_deref());
    start_server(&config.server.host, config.server.port, router, cancel.clone()).await?;

    // The server can also stop on its own (e.g. a bind failure after startup).
    cancel.cancel();
    if let Err(e) = sweeper.await {
        warn!(error = %e, "job sweeper task ended abnormally");
    }
    if let Err(e) = pruner.await {
        warn!(error = %e, "rate-limit pruner task ended abnormally");
    }

    info!("sitesmith serve shutdown complete");
    Ok(())
}

/// Expired rate-limit windows are dropped once per shortest window.
fn limiter_prune_interval(config: &SitesmithConfig) -> Duration {
    let limits = &config.rate_limit;
    let secs = limits.submit_window_secs.min(limits.contact_window_secs).max(1);
    Duration::from_secs(secs)
}

/// Generated sites post their forms back to this server when it has a
/// public origin; otherwise they use relative `/api/...` paths.
fn site_builder(config: &SitesmithConfig) -> StaticSiteBuilder {
    match config.server.public_base_url.as_deref() {
        Some(origin) => StaticSiteBuilder::new().with_api_origin(origin),
        None => StaticSiteBuilder::new(),
    }
}

/// The CRM relay, or `None` when no `[crm]` setting is present at all.
fn crm_relay(config: &SitesmithConfig) -> Result<Option<Arc<dyn CrmRelay>>, SitesmithError> {
    let crm = &config.crm;
    let configured = crm.contact_webhook_url.is_some()
        || crm.booking_webhook_url.is_some()
        || crm.calendar_id.is_some();
    if !configured {
        info!("no CRM settings, contact and booking relays disabled");
        return Ok(None);
    }
    let client = sitesmith_crm::crm_from_config(config)?;
    Ok(Some(Arc::new(client)))
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sitesmith={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitesmith_core::traits::ServiceAdapter;
    use sitesmith_core::types::AdapterType;

    #[test]
    fn limiter_prune_interval_follows_shortest_window() {
        let mut config = SitesmithConfig::default();
        config.rate_limit.submit_window_secs = 3600;
        config.rate_limit.contact_window_secs = 60;
        assert_eq!(limiter_prune_interval(&config), Duration::from_secs(60));

        config.rate_limit.contact_window_secs = 0;
        assert_eq!(limiter_prune_interval(&config), Duration::from_secs(1));
    }

    #[test]
    fn crm_is_disabled_without_settings() {
        let config = SitesmithConfig::default();
        assert!(crm_relay(&config).unwrap().is_none());
    }

    #[test]
    fn crm_is_enabled_by_a_webhook() {
        let mut config = SitesmithConfig::default();
        config.crm.contact_webhook_url = Some("https://hooks.example.com/contact".into());
        let relay = crm_relay(&config).unwrap().expect("relay configured");
        assert_eq!(relay.adapter_type(), AdapterType::Crm);
    }
}
