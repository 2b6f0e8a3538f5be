//! Per-client sliding-window rate limiting.
//!
//! Best-effort and in-process: counters reset on restart and are not shared
//! between instances.

use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use tokio::time::Instant;
use tracing::warn;

use crate::errors::AppError;

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Records one request for `client`.
    /// Returns how long until a slot frees up when the window is already full.
    pub fn check(&self, client: IpAddr) -> Result<(), Duration> {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        let window = hits.entry(client).or_default();

        while window
            .front()
            .is_some_and(|&t| now.duration_since(t) >= self.window)
        {
            window.pop_front();
        }

        if window.len() >= self.max_requests {
            let retry_after = window
                .front()
                .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
                .unwrap_or(self.window);
            return Err(retry_after);
        }

        window.push_back(now);
        Ok(())
    }

    /// Forgets clients whose whole window has elapsed. Returns how many were dropped.
    pub fn purge_idle(&self) -> usize {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        let before = hits.len();
        hits.retain(|_, window| {
            window
                .back()
                .is_some_and(|&t| now.duration_since(t) < self.window)
        });
        before - hits.len()
    }
}

/// First hop of `x-forwarded-for`, else the socket peer, else unspecified.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .or(peer.map(|addr| addr.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn rate_limited(retry_after: Duration) -> AppError {
    let retry_after_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    let reset = chrono::Duration::from_std(retry_after)
        .map(|d| Utc::now() + d)
        .unwrap_or_else(|_| Utc::now());
    AppError::RateLimited {
        retry_after_secs,
        reset_at: reset.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// Axum middleware: rejects with 429 once a client exhausts its window.
pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_ip(request.headers(), peer);

    if let Err(retry_after) = limiter.check(client) {
        warn!("Rate limit exceeded for {client} on {}", request.uri().path());
        return Err(rate_limited(retry_after));
    }

    Ok(next.run(request).await)
}
