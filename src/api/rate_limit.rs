// =============================================================================
// Anonymous-caller rate limiter
// =============================================================================
//
// Sliding window per client: each client may make `limit` requests in any
// `window`-long span. Authenticated callers bypass the limiter entirely.
//
// State is a map of client -> recent request instants behind a parking_lot
// mutex; the critical section is a few deque operations.
// =============================================================================

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::auth::{classify, Caller};
use crate::app_state::AppState;

/// Above this many tracked clients, idle entries are swept on the next check.
const SWEEP_THRESHOLD: usize = 10_000;

pub struct RateLimiter {
    limit: u32,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `client` now. `Err` carries how long until the
    /// oldest request in the window expires.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> Result<(), Duration> {
        let mut hits = self.hits.lock();

        if hits.len() > SWEEP_THRESHOLD {
            let window = self.window;
            hits.retain(|_, q| q.back().is_some_and(|t| now.duration_since(*t) < window));
        }

        let queue = hits.entry(client.to_string()).or_default();
        while queue
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            queue.pop_front();
        }

        if queue.len() >= self.limit as usize {
            let retry_after = queue
                .front()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.window);
            return Err(retry_after);
        }

        queue.push_back(now);
        Ok(())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.hits.lock().len()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("limit", &self.limit)
            .field("window", &self.window)
            .field("tracked_clients", &self.tracked_clients())
            .finish()
    }
}

// =============================================================================
// Middleware
// =============================================================================

/// Axum middleware: authenticated callers pass, anonymous callers are counted.
pub async fn enforce(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);

    match classify(
        request.headers(),
        peer,
        &state.config.api_keys,
        state.config.trust_forwarded_for,
    ) {
        Caller::Authenticated => next.run(request).await,
        Caller::Anonymous { client } => match state.rate_limiter.check(&client) {
            Ok(()) => {
                debug!(client = %client, "anonymous request admitted");
                next.run(request).await
            }
            Err(retry_after) => {
                // Round up so clients never retry a moment too early.
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                warn!(client = %client, retry_after_secs = secs, "anonymous rate limit exceeded");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, secs.to_string())],
                    Json(serde_json::json!({
                        "error": "Rate limit exceeded. Provide a valid x-api-key for unlimited access.",
                    })),
                )
                    .into_response()
            }
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
