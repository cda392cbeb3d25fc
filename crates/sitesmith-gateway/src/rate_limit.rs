// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-window request limits per client.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use dashmap::DashMap;

/// Past this many tracked clients, expired windows are dropped before a new
/// client is counted.
const MAX_TRACKED_CLIENTS: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Allows `max` requests per client in each `window`.
#[derive(Debug)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    max_clients: usize,
    clients: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            max_clients: MAX_TRACKED_CLIENTS,
            clients: DashMap::new(),
        }
    }

    /// Counts a request. `Err` carries how long until the window resets.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> Result<(), Duration> {
        // Client keys come from request headers, so the map is bounded here
        // as well as by the periodic pruner.
        if self.clients.len() >= self.max_clients && !self.clients.contains_key(client) {
            self.prune_at(now);
        }
        let mut entry = self.clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }
        if entry.count >= self.max {
            return Err(self.window.saturating_sub(elapsed));
        }
        entry.count += 1;
        Ok(())
    }

    /// Forgets clients whose window has passed. Returns how many were dropped.
    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    fn prune_at(&self, now: Instant) -> usize {
        let before = self.clients.len();
        self.clients
            .retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        before.saturating_sub(self.clients.len())
    }

    /// Number of clients currently holding a window.
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

/// Client identity: first `X-Forwarded-For` hop, then `X-Real-IP`, then the
/// socket address.
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn allows_up_to_max_then_rejects() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a", now).is_ok());
        assert!(limiter.check_at("a", now).is_ok());
        let retry = limiter.check_at("a", now + Duration::from_secs(10)).unwrap_err();
        assert_eq!(retry, Duration::from_secs(50));
        assert!(limiter.check_at("b", now).is_ok());
    }

    #[test]
    fn window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a", now).is_ok());
        assert!(limiter.check_at("a", now).is_err());
        assert!(limiter.check_at("a", now + Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn prune_drops_only_expired_windows() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let now = Instant::now();
        limiter.check_at("old", now).unwrap();
        limiter.check_at("new", now + Duration::from_secs(30)).unwrap();

        assert_eq!(limiter.prune_at(now + Duration::from_secs(61)), 1);
        assert_eq!(limiter.tracked_clients(), 1);
        assert!(limiter.clients.contains_key("new"));
    }

    #[test]
    fn full_map_is_pruned_before_a_new_client() {
        let mut limiter = RateLimiter::new(5, Duration::from_secs(60));
        limiter.max_clients = 3;
        let now = Instant::now();
        for client in ["a", "b", "c"] {
            limiter.check_at(client, now).unwrap();
        }

        // Still inside the window: nothing can be dropped.
        limiter.check_at("d", now + Duration::from_secs(1)).unwrap();
        assert_eq!(limiter.tracked_clients(), 4);

        limiter.check_at("e", now + Duration::from_secs(90)).unwrap();
        assert_eq!(limiter.tracked_clients(), 1);
        assert!(limiter.clients.contains_key("e"));
    }

    #[test]
    fn client_id_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_id(&headers, None), "10.0.0.2");

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_id(&headers, None), "203.0.113.7");

        let peer: SocketAddr = "192.0.2.1:5555".parse().unwrap();
        assert_eq!(client_id(&HeaderMap::new(), Some(peer)), "192.0.2.1");
        assert_eq!(client_id(&HeaderMap::new(), None), "unknown");
    }
}
