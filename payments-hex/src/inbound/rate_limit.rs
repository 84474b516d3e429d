//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;
use std::{
    num::NonZeroU32,
    sync::Arc,
    time::{Duration, Instant},
};

/// Header identifying the client behind a proxy.
///
/// The first value is trusted as the client address, so the server must sit
/// behind a proxy that overwrites this header. Exposed directly, callers can
/// rotate it to dodge their quota.
const CLIENT_HEADER: &str = "x-forwarded-for";

/// Tracked clients above which idle limiters are evicted.
const DEFAULT_MAX_CLIENTS: usize = 10_000;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

struct ClientLimiter {
    limiter: Arc<DirectLimiter>,
    last_seen: Instant,
}

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-client rate limiters
    limiters: DashMap<String, ClientLimiter>,
    /// Quota for new clients
    quota: Quota,
    /// Idle time after which a client's bucket is full again.
    refill_time: Duration,
    max_clients: usize,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state allowing `requests` per `period`.
    ///
    /// A zero `requests` or `period` is treated as one.
    pub fn new(requests: u32, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst);

        Self {
            limiters: DashMap::new(),
            quota,
            refill_time: period.checked_mul(burst.get()).unwrap_or(Duration::MAX),
            max_clients: DEFAULT_MAX_CLIENTS,
        }
    }

    /// Sets how many clients are tracked before idle ones are evicted.
    pub fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients.max(1);
        self
    }

    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        if self.limiters.len() >= self.max_clients && !self.limiters.contains_key(key) {
            self.evict_idle(now);
        }

        let limiter = {
            let mut entry = self
                .limiters
                .entry(key.to_string())
                .or_insert_with(|| ClientLimiter {
                    limiter: Arc::new(RateLimiter::direct(self.quota)),
                    last_seen: now,
                });
            entry.last_seen = now;
            entry.limiter.clone()
        };

        limiter.check().is_ok()
    }

    /// Number of clients currently tracked.
    pub fn client_count(&self) -> usize {
        self.limiters.len()
    }

    /// Drops limiters idle long enough to have refilled completely; a fresh
    /// limiter for that client behaves identically.
    fn evict_idle(&self, now: Instant) {
        let before = self.limiters.len();
        self.limiters
            .retain(|_, client| now.duration_since(client.last_seen) < self.refill_time);
        tracing::debug!(
            evicted = before.saturating_sub(self.limiters.len()),
            "Evicted idle rate limiters"
        );
    }
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = request
        .headers()
        .get(CLIENT_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "anonymous".to_string());

    if !limiter.check(&key) {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_is_per_client() {
        let limiter = RateLimiterState::new(2, Duration::from_secs(60));

        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));
    }

    #[test]
    fn test_idle_clients_evicted_at_capacity() {
        let limiter = RateLimiterState::new(1, Duration::from_millis(10)).with_max_clients(2);

        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));
        assert_eq!(limiter.client_count(), 2);

        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check("10.0.0.3"));

        assert_eq!(limiter.client_count(), 1);
    }

    #[test]
    fn test_active_clients_survive_eviction() {
        let limiter = RateLimiterState::new(1, Duration::from_secs(60)).with_max_clients(1);

        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));

        // Not idle for a full refill, so its exhausted bucket is kept.
        assert_eq!(limiter.client_count(), 2);
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn test_zero_quota_still_allows_one() {
        let limiter = RateLimiterState::new(0, Duration::from_secs(60));

        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
    }
}
