//! Application-layer rate limiting for the unauthenticated account routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

/// Entries untouched for this long are dropped by [`RateLimiter::cleanup`]
const STALE_AFTER_SECS: u64 = 300;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window limit for one route group
#[derive(Debug, Clone, Copy)]
pub struct Limit {
    pub route: &'static str,
    pub max_requests: u32,
    pub window_secs: u64,
}

pub const LOGIN: Limit = Limit {
    route: "login",
    max_requests: 5,
    window_secs: 60,
};

pub const REGISTER: Limit = Limit {
    route: "register",
    max_requests: 3,
    window_secs: 60,
};

/// verify-otp and resend-otp
pub const OTP: Limit = Limit {
    route: "otp",
    max_requests: 5,
    window_secs: 60,
};

pub const PASSWORD_RESET: Limit = Limit {
    route: "password_reset",
    max_requests: 5,
    window_secs: 60,
};

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    async fn check(&self, limit: Limit, ip: &str) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(limit.route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start).as_secs() >= limit.window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= limit.max_requests
    }

    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(STALE_AFTER_SECS);
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }
        map.retain(|_, route_map| !route_map.is_empty());
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.inner.lock().await.values().map(HashMap::len).sum()
    }
}

/// Client IP: first X-Forwarded-For entry (load balancer), then the peer address
fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn enforce(state: &AppState, limit: Limit, request: Request, next: Next) -> Response {
    let ip = extract_ip(&request);
    if !state.rate_limiter.check(limit, &ip).await {
        tracing::warn!(route = limit.route, ip = %ip, "Rate limit exceeded");
        return AppError::new(ErrorCode::TooManyRequests).into_response();
    }
    next.run(request).await
}

pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    enforce(&state, LOGIN, request, next).await
}

pub async fn register_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    enforce(&state, REGISTER, request, next).await
}

pub async fn otp_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    enforce(&state, OTP, request, next).await
}

pub async fn password_reset_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    enforce(&state, PASSWORD_RESET, request, next).await
}
