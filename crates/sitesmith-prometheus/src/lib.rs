// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics for Sitesmith.
//!
//! Recording goes through the metrics-rs facade, so the helpers in
//! [`recording`] are no-ops until [`PrometheusExporter::new`] installs the
//! recorder. The gateway renders the text format on `/metrics`.

pub mod recording;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sitesmith_core::SitesmithError;

pub use recording::{
    record_fallback, record_image_lookup, record_job_finished, record_job_submitted,
    set_jobs_in_store,
};

/// Owns the process-wide Prometheus recorder.
#[derive(Clone)]
pub struct PrometheusExporter {
    handle: PrometheusHandle,
}

impl PrometheusExporter {
    /// Installs the recorder globally. Fails if one is already installed.
    pub fn new() -> Result<Self, SitesmithError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            SitesmithError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();
        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// Wraps a handle from a recorder built elsewhere.
    pub fn from_handle(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// Current metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_recorder_renders_recorded_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let exporter = PrometheusExporter::from_handle(recorder.handle());

        metrics::with_local_recorder(&recorder, || {
            record_job_submitted();
            record_job_finished("completed", 12.5);
            record_image_lookup("unsplash");
            record_fallback("colors");
            set_jobs_in_store(3);
        });

        let text = exporter.render();
        assert!(text.contains("sitesmith_jobs_submitted_total 1"), "{text}");
        assert!(text.contains("sitesmith_jobs_finished_total{status=\"completed\"} 1"), "{text}");
        assert!(text.contains("sitesmith_image_lookups_total{outcome=\"unsplash\"} 1"), "{text}");
        assert!(text.contains("sitesmith_fallbacks_total{step=\"colors\"} 1"), "{text}");
        assert!(text.contains("sitesmith_jobs_in_store 3"), "{text}");
        assert!(text.contains("sitesmith_job_duration_seconds"), "{text}");
    }

    #[test]
    fn helpers_are_no_ops_without_recorder() {
        record_job_submitted();
        record_fallback("template");
        set_jobs_in_store(0);
    }
}
