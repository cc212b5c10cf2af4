use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

/// Token bucket refilled at `rps` tokens per second, holding at most `rps`.
/// One bucket is shared by every request on the router it guards.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    rps: u32,
    bucket: Arc<Mutex<Bucket>>,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Self {
        let rps = rps.max(1);
        Self {
            rps,
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: f64::from(rps),
                refilled_at: Instant::now(),
            })),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut bucket = match self.bucket.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.refilled_at).as_secs_f64();
        let capacity = f64::from(self.rps);
        bucket.tokens = (bucket.tokens + elapsed * capacity).min(capacity);
        bucket.refilled_at = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.try_acquire() {
        tracing::warn!(path = %req.uri().path(), "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "1")],
            Json(json!({ "detail": "rate_limit_exceeded" })),
        )
            .into_response();
    }
    next.run(req).await
}
