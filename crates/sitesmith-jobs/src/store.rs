// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory job registry.
//!
//! Each `update_job` is a read-modify-write under the `DashMap` shard lock of
//! that entry, so concurrent patches to one job never interleave. Every
//! mutation is announced on a broadcast channel as a [`JobEvent`]. Updates
//! carry the new status and progress; subscribers re-read the store for the
//! rest of the record.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sitesmith_config::model::JobsConfig;
use sitesmith_core::types::{Job, JobEvent, JobPatch, WebsiteRequest};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 256;

pub struct JobStore {
    jobs: DashMap<String, Job>,
    /// Idempotency key -> job id.
    keys: DashMap<String, String>,
    events: broadcast::Sender<JobEvent>,
    retention: Duration,
    preserve_in_flight: bool,
}

impl JobStore {
    pub fn new(retention: Duration, preserve_in_flight: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            jobs: DashMap::new(),
            keys: DashMap::new(),
            events,
            retention,
            preserve_in_flight,
        }
    }

    pub fn from_config(config: &JobsConfig) -> Self {
        Self::new(
            Duration::from_secs(config.retention_secs),
            config.preserve_in_flight,
        )
    }

    /// Stores a fresh queued job and returns a copy of it.
    pub fn create_job(&self, input: WebsiteRequest) -> Job {
        let job = Job::new(input);
        self.jobs.insert(job.id.clone(), job.clone());
        debug!(job_id = %job.id, "job created");
        self.notify(JobEvent::Created(job.id.clone()));
        job
    }

    /// Like [`create_job`](Self::create_job), but a key already bound to a
    /// stored job returns that job instead. The flag is `true` when a new job
    /// was created.
    pub fn create_job_with_key(&self, input: WebsiteRequest, key: &str) -> (Job, bool) {
        use dashmap::mapref::entry::Entry;

        // The key entry stays locked until the new job is stored, so two
        // requests with the same key cannot both create a job.
        match self.keys.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if let Some(existing) = self.get_job(entry.get()) {
                    debug!(job_id = %existing.id, "idempotency key matched");
                    return (existing, false);
                }
                let job = self.create_job(input);
                entry.insert(job.id.clone());
                (job, true)
            }
            Entry::Vacant(entry) => {
                let job = self.create_job(input);
                entry.insert(job.id.clone());
                (job, true)
            }
        }
    }

    pub fn get_job(&self, id: &str) -> Option<Job> {
        self.jobs.get(id).map(|job| job.clone())
    }

    /// Merges `patch` into the job and returns the merged record.
    ///
    /// A status change that breaks the lifecycle order is ignored; the other
    /// fields of the patch still apply.
    pub fn update_job(&self, id: &str, patch: JobPatch) -> Option<Job> {
        let updated = {
            let mut job = self.jobs.get_mut(id)?;

            if let Some(next) = patch.status {
                if job.status.can_transition_to(next) {
                    job.status = next;
                } else {
                    warn!(
                        job_id = %id,
                        from = %job.status,
                        to = %next,
                        "ignoring invalid status transition"
                    );
                }
            }
            if let Some(progress) = patch.progress {
                job.progress = progress.min(100);
            }
            if let Some(message) = patch.message {
                job.message = message;
            }
            if let Some(result) = patch.result {
                job.result = result;
            }
            if let Some(error) = patch.error {
                job.error = error;
            }
            job.updated_at = Utc::now();
            job.clone()
        };

        self.notify(JobEvent::Updated {
            id: id.to_string(),
            status: updated.status,
            progress: updated.progress,
        });
        Some(updated)
    }

    /// Removes the job. Deleting an unknown id is a no-op.
    pub fn delete_job(&self, id: &str) {
        if self.jobs.remove(id).is_some() {
            self.keys.retain(|_, job_id| job_id != id);
            self.notify(JobEvent::Deleted(id.to_string()));
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Receives the id of every job created, updated or deleted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    /// Deletes jobs created more than the retention window before `now`.
    /// Returns how many were removed.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let retention = chrono::Duration::from_std(self.retention).unwrap_or(chrono::TimeDelta::MAX);
        let Some(cutoff) = now.checked_sub_signed(retention) else {
            return 0;
        };

        let expired: Vec<String> = self
            .jobs
            .iter()
            .filter(|job| job.created_at <= cutoff)
            .filter(|job| !(self.preserve_in_flight && !job.status.is_terminal()))
            .map(|job| job.id.clone())
            .collect();

        for id in &expired {
            self.delete_job(id);
        }
        if !expired.is_empty() {
            info!(removed = expired.len(), remaining = self.len(), "expired jobs swept");
        }
        sitesmith_prometheus::set_jobs_in_store(self.len());
        expired.len()
    }

    /// Runs [`sweep_expired`](Self::sweep_expired) every `interval` until
    /// `cancel` fires.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        store.sweep_expired(Utc::now());
                    }
                    _ = cancel.cancelled() => {
                        debug!("job sweeper shutting down");
                        break;
                    }
                }
            }
        })
    }

    fn notify(&self, event: JobEvent) {
        sitesmith_prometheus::set_jobs_in_store(self.jobs.len());
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
