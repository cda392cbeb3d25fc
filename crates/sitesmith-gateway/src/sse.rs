// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events stream of job snapshots.
//!
//! The first event is the job as it was when the request arrived. After that
//! the store is re-read on every poll tick and on every change notification
//! for this job. Event format:
//!
//! ```text
//! data: {"id":"...","status":"processing","progress":45,...}
//!
//! event: error
//! data: {"error":"Job not found"}
//!
//! event: timeout
//! data: {"error":"Status stream timed out"}
//! ```
//!
//! The stream ends after a terminal snapshot, an `error` event or a `timeout`
//! event. Dropping the response (client disconnect) ends polling.

use std::convert::Infallible;
use std::sync::Arc;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use sitesmith_core::types::{Job, JobEvent};
use sitesmith_jobs::JobStore;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{Instant, Interval};
use tracing::debug;

use crate::server::GatewayState;

enum Phase {
    Initial(Box<Job>),
    Watching,
    Done,
}

struct Watch {
    store: Arc<JobStore>,
    job_id: String,
    events: broadcast::Receiver<JobEvent>,
    ticker: Interval,
    deadline: Instant,
    phase: Phase,
}

impl Watch {
    /// Waits for the next reason to re-read the store. `false` means the
    /// stream window elapsed.
    async fn wait(&mut self) -> bool {
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(self.deadline) => return false,
                _ = self.ticker.tick() => return true,
                received = self.events.recv() => match received {
                    Ok(event) if event.job_id() == self.job_id => return true,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => return true,
                    Err(RecvError::Closed) => {
                        self.ticker.tick().await;
                        return true;
                    }
                },
            }
        }
    }

    fn snapshot(&mut self) -> Event {
        match self.store.get_job(&self.job_id) {
            Some(job) => self.job_event(&job),
            None => {
                debug!(job_id = %self.job_id, "job disappeared while streaming");
                self.phase = Phase::Done;
                Event::default()
                    .event("error")
                    .data(r#"{"error":"Job not found"}"#)
            }
        }
    }

    fn job_event(&mut self, job: &Job) -> Event {
        if job.status.is_terminal() {
            self.phase = Phase::Done;
        }
        Event::default().json_data(job).unwrap_or_else(|e| {
            self.phase = Phase::Done;
            Event::default()
                .event("error")
                .data(serde_json::json!({ "error": e.to_string() }).to_string())
        })
    }
}

/// Streams snapshots of `job` until it reaches a terminal state.
pub fn status_stream(
    state: &GatewayState,
    job: Job,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + use<>> {
    let settings = state.stream;
    let start = Instant::now();
    let watch = Watch {
        store: Arc::clone(&state.store),
        job_id: job.id.clone(),
        events: state.store.subscribe(),
        ticker: tokio::time::interval_at(start + settings.poll_interval, settings.poll_interval),
        deadline: start + settings.max_duration,
        phase: Phase::Initial(Box::new(job)),
    };

    let events = stream::unfold(watch, |mut watch| async move {
        match std::mem::replace(&mut watch.phase, Phase::Watching) {
            Phase::Done => None,
            Phase::Initial(job) => {
                let event = watch.job_event(&job);
                Some((Ok(event), watch))
            }
            Phase::Watching => {
                if !watch.wait().await {
                    watch.phase = Phase::Done;
                    let event = Event::default()
                        .event("timeout")
                        .data(r#"{"error":"Status stream timed out"}"#);
                    return Some((Ok(event), watch));
                }
                let event = watch.snapshot();
                Some((Ok(event), watch))
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::new().interval(settings.keep_alive))
}
