// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions and recording helpers.

use metrics::{describe_counter, describe_gauge, describe_histogram};

/// Registers descriptions for every Sitesmith metric.
pub fn register_metrics() {
    describe_counter!(
        "sitesmith_jobs_submitted_total",
        "Website generation jobs accepted"
    );
    describe_counter!(
        "sitesmith_jobs_finished_total",
        "Generation jobs that reached a terminal status"
    );
    describe_counter!(
        "sitesmith_image_lookups_total",
        "Image lookups by the provider that answered, or none"
    );
    describe_counter!(
        "sitesmith_fallbacks_total",
        "Pipeline steps that fell back to a default"
    );
    describe_gauge!("sitesmith_jobs_in_store", "Jobs currently held in memory");
    describe_histogram!(
        "sitesmith_job_duration_seconds",
        "Wall time from processing start to terminal status"
    );
}

pub fn record_job_submitted() {
    metrics::counter!("sitesmith_jobs_submitted_total").increment(1);
}

/// Counts a finished job and records how long it ran.
pub fn record_job_finished(status: &str, seconds: f64) {
    metrics::counter!("sitesmith_jobs_finished_total", "status" => status.to_string())
        .increment(1);
    metrics::histogram!("sitesmith_job_duration_seconds", "status" => status.to_string())
        .record(seconds);
}

/// `outcome` is the provider that returned a photo, or `none`.
pub fn record_image_lookup(outcome: &str) {
    metrics::counter!("sitesmith_image_lookups_total", "outcome" => outcome.to_string())
        .increment(1);
}

pub fn record_fallback(step: &str) {
    metrics::counter!("sitesmith_fallbacks_total", "step" => step.to_string()).increment(1);
}

pub fn set_jobs_in_store(count: usize) {
    metrics::gauge!("sitesmith_jobs_in_store").set(count as f64);
}
