// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware and shared state.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::routing::{get, post};
use sitesmith_config::SitesmithConfig;
use sitesmith_core::traits::CrmRelay;
use sitesmith_core::SitesmithError;
use sitesmith_jobs::{JobOrchestrator, JobStore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::handlers;
use crate::rate_limit::RateLimiter;
use crate::status;

/// Render function for the `/metrics` endpoint.
pub type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

/// Status streaming settings.
#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    pub poll_interval: Duration,
    pub max_duration: Duration,
    pub keep_alive: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_duration: Duration::from_secs(300),
            keep_alive: Duration::from_secs(15),
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<JobStore>,
    pub orchestrator: Arc<JobOrchestrator>,
    /// `None` when no CRM relay is configured.
    pub crm: Option<Arc<dyn CrmRelay>>,
    pub submit_limiter: Arc<RateLimiter>,
    pub contact_limiter: Arc<RateLimiter>,
    pub stream: StreamSettings,
    /// Origin prefixed to `statusUrl`; relative URLs when `None`.
    pub public_base_url: Option<String>,
    pub start_time: Instant,
    pub metrics: Option<MetricsRender>,
}

impl GatewayState {
    pub fn new(store: Arc<JobStore>, orchestrator: Arc<JobOrchestrator>, config: &SitesmithConfig) -> Self {
        let limits = &config.rate_limit;
        Self {
            store,
            orchestrator,
            crm: None,
            submit_limiter: Arc::new(RateLimiter::new(
                limits.submit_max,
                Duration::from_secs(limits.submit_window_secs),
            )),
            contact_limiter: Arc::new(RateLimiter::new(
                limits.contact_max,
                Duration::from_secs(limits.contact_window_secs),
            )),
            stream: StreamSettings {
                poll_interval: Duration::from_millis(config.status.poll_interval_ms),
                max_duration: Duration::from_secs(config.status.max_stream_secs),
                ..StreamSettings::default()
            },
            public_base_url: config
                .server
                .public_base_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
            start_time: Instant::now(),
            metrics: None,
        }
    }

    pub fn with_crm(mut self, crm: Arc<dyn CrmRelay>) -> Self {
        self.crm = Some(crm);
        self
    }

    pub fn with_metrics(mut self, render: MetricsRender) -> Self {
        self.metrics = Some(render);
        self
    }

    /// Drops expired rate-limit windows every `interval` until `cancel`
    /// fires.
    pub fn spawn_limiter_pruner(&self, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let limiters = [Arc::clone(&self.submit_limiter), Arc::clone(&self.contact_limiter)];
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let dropped: usize = limiters.iter().map(|l| l.prune()).sum();
                        if dropped > 0 {
                            debug!(dropped, "pruned expired rate-limit windows");
                        }
                    }
                    _ = cancel.cancelled() => {
                        debug!("rate-limit pruner shutting down");
                        break;
                    }
                }
            }
        })
    }
}

/// Builds the application router.
///
/// Unknown paths are served from `static_dir` when one is given.
pub fn build_router(state: GatewayState, static_dir: Option<&str>) -> Router {
    let api = Router::new()
        .route("/api/generate-website", post(handlers::post_generate_website))
        .route("/api/website-status", get(status::get_website_status))
        .route("/api/contact", post(handlers::post_contact))
        .route("/api/booking", post(handlers::post_booking))
        .route("/api/calendar/slots", get(handlers::get_calendar_slots))
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serves the gateway until `cancel` fires, then drains in-flight requests.
pub async fn start_server(
    host: &str,
    port: u16,
    router: Router,
    cancel: CancellationToken,
) -> Result<(), SitesmithError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SitesmithError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("gateway listening on {addr}");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(cancel.cancelled_owned())
    .await
    .map_err(|e| SitesmithError::Internal(format!("gateway server error: {e}")))?;

    info!("gateway stopped");
    Ok(())
}
