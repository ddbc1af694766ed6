//! # Admission Middleware
//!
//! Runs the fixed-window check before the handler and stamps the advisory
//! headers on every response, allowed or not.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use cvm_proxy_core::rate_limit::{self, Decision};
use tracing::debug;

use super::response::ApiError;
use super::state::AppState;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
const X_FORWARDED_FOR: &str = "x-forwarded-for";

pub async fn admit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let forwarded_for: Option<&str> = request
        .headers()
        .get(X_FORWARDED_FOR)
        .and_then(|value| value.to_str().ok());
    let peer: Option<IpAddr> = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let key: String = rate_limit::client_key(state.trust_proxy, forwarded_for, peer);
    let decision: Decision = state.limiter.check(&key, state.clock.now_millis());

    let mut response: Response = if decision.allowed {
        next.run(request).await
    } else {
        debug!(client = %key, retry_after = ?decision.retry_after_secs, "rate limit exceeded");
        ApiError::RateLimited {
            retry_after_secs: decision.retry_after_secs.unwrap_or_default(),
        }
        .into_response()
    };

    stamp_headers(response.headers_mut(), &decision);
    response
}

fn stamp_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(decision.reset_epoch_secs()));
    if let Some(retry_after) = decision.retry_after_secs {
        headers.insert(RETRY_AFTER, HeaderValue::from(retry_after));
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
