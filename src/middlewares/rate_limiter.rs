use std::time::{Duration, Instant};

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde_json::{Value, json};

use crate::config::RateLimitConfig;
use crate::middlewares::proxy::ClientIp;
use crate::utils::response::ApiResponse;

struct Bucket {
    tokens: f64,
    last: Instant,
}

static BUCKETS: Lazy<DashMap<String, Bucket>> = Lazy::new(DashMap::new);

/// Per-client token bucket. Clients are keyed by the [`ClientIp`] extension,
/// so the proxy middleware must run first.
pub async fn rate_limiter(
    State(config): State<RateLimitConfig>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Value>>)> {
    let key = req
        .extensions()
        .get::<ClientIp>()
        .map(|ClientIp(ip)| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let Some(remaining) = take_token(&key, &config, Instant::now()) else {
        tracing::warn!(client = %key, "rate limit exceeded");
        let response = ApiResponse::error_with_data(
            "Too Many Requests",
            json!({ "error": "Rate limit exceeded" }),
        );
        return Err((StatusCode::TOO_MANY_REQUESTS, Json(response)));
    };

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    Ok(response)
}

/// Refill `key`'s bucket up to `now` and spend one token, returning the whole
/// tokens left, or `None` if the bucket is empty.
fn take_token(key: &str, config: &RateLimitConfig, now: Instant) -> Option<u64> {
    let mut bucket = BUCKETS.entry(key.to_string()).or_insert_with(|| Bucket {
        tokens: config.burst,
        last: now,
    });

    let elapsed = now.saturating_duration_since(bucket.last).as_secs_f64();
    bucket.tokens = (bucket.tokens + elapsed * config.rate_per_sec).min(config.burst);
    bucket.last = now;

    if bucket.tokens >= 1.0 {
        bucket.tokens -= 1.0;
        Some(bucket.tokens.floor() as u64)
    } else {
        None
    }
}

/// Drop buckets untouched for at least `ttl`. Returns how many were removed.
pub fn purge_stale_buckets(ttl: Duration) -> usize {
    let now = Instant::now();
    let before = BUCKETS.len();
    BUCKETS.retain(|_, bucket| now.saturating_duration_since(bucket.last) < ttl);
    before.saturating_sub(BUCKETS.len())
}

/// Number of clients currently tracked.
pub fn bucket_count() -> usize {
    BUCKETS.len()
}

/// Periodically purge idle buckets for the life of the runtime.
pub fn spawn_bucket_janitor(ttl: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ttl.max(Duration::from_secs(1)));
        loop {
            interval.tick().await;
            let purged = purge_stale_buckets(ttl);
            if purged > 0 {
                tracing::debug!(purged, remaining = bucket_count(), "purged idle rate-limit buckets");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rate_per_sec: f64, burst: f64) -> RateLimitConfig {
        RateLimitConfig {
            rate_per_sec,
            burst,
            bucket_ttl: Duration::from_secs(60),
        }
    }

    #[test]
    fn bucket_drains_then_refills() {
        let config = config(2.0, 2.0);
        let start = Instant::now();
        let key = "unit-refill";

        assert_eq!(take_token(key, &config, start), Some(1));
        assert_eq!(take_token(key, &config, start), Some(0));
        assert_eq!(take_token(key, &config, start), None);

        // half a second at 2 tokens/s buys one more request
        let later = start + Duration::from_millis(500);
        assert_eq!(take_token(key, &config, later), Some(0));
        assert_eq!(take_token(key, &config, later), None);
    }

    #[test]
    fn refill_is_capped_at_burst() {
        let config = config(100.0, 3.0);
        let start = Instant::now();
        let key = "unit-cap";

        assert_eq!(take_token(key, &config, start), Some(2));
        let much_later = start + Duration::from_secs(3600);
        assert_eq!(take_token(key, &config, much_later), Some(2));
    }
}
