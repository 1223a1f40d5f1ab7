//! Fixed-window rate limiting keyed by client IP.
//!
//! The counter store is explicit state owned by `AppState` (no globals) and
//! time comes from an injected `Clock`, so window expiry is testable without
//! sleeping.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::state::AppState;

/// Time source for window expiry. Production uses `SystemClock`; tests inject
/// a manual clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Window {
    count: u32,
    started: Instant,
}

/// Per-client fixed-window counter store.
pub struct RateLimiter {
    window: Duration,
    max: u32,
    clock: Box<dyn Clock>,
    buckets: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max: u32) -> Self {
        Self::with_clock(window, max, Box::new(SystemClock))
    }

    pub fn with_clock(window: Duration, max: u32, clock: Box<dyn Clock>) -> Self {
        Self {
            window,
            max,
            clock,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Records one request for `client` and returns whether it is allowed.
    /// Expired windows are pruned on every call, so the store is bounded by
    /// the number of clients active within one window. An expired client
    /// re-enters with a fresh window.
    pub fn check(&self, client: &str) -> bool {
        let now = self.clock.now();
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());

        buckets.retain(|_, window| now.duration_since(window.started) <= self.window);

        let window = buckets.entry(client.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        window.count += 1;
        window.count <= self.max
    }
}

/// Axum middleware applying the limiter to every request. The client identity
/// is the `x-forwarded-for` header, falling back to loopback.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("127.0.0.1")
        .to_string();

    if !state.limiter.check(&client) {
        tracing::warn!("Rate limit exceeded for client {client}");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}
