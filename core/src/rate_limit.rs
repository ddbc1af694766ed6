//! # Admission Controller
//!
//! Fixed-window request counter keyed by client identity.
//!
//! Each key owns one window `{count, reset_at}`. The first request from a key,
//! or the first one after its window has expired, opens a fresh window. Later
//! requests inside the window increment the count and are admitted while it
//! stays within the limit. Nothing here ever fails: every call yields a [`Decision`].

use std::net::IpAddr;
use std::time::Duration;

use dashmap::DashMap;

/// Bucket used when a request carries no usable client identity.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    /// Requests left in the current window. Reported as `0` on denial.
    pub remaining: u32,
    /// Milliseconds since the Unix epoch at which the window ends.
    pub reset_at: u64,
    /// Whole seconds until the window ends, only set on denial.
    pub retry_after_secs: Option<u64>,
}

impl Decision {
    /// `reset_at` in whole epoch seconds, rounded up.
    pub fn reset_epoch_secs(&self) -> u64 {
        self.reset_at.div_ceil(1000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RateWindow {
    count: u32,
    reset_at: u64,
}

/// Windows live in a sharded map; a key's read-modify-write happens under its
/// shard lock, so concurrent requests from one client are counted exactly.
pub struct RateLimiter {
    window_ms: u64,
    max: u32,
    windows: DashMap<String, RateWindow>,
}

impl RateLimiter {
    pub fn new(window: Duration, max: u32) -> Self {
        Self {
            window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            max,
            windows: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Counts one request from `key` at `now` (epoch milliseconds).
    pub fn check(&self, key: &str, now: u64) -> Decision {
        let window: RateWindow = self.advance(key, now);

        let allowed: bool = window.count <= self.max;
        let retry_after_secs: Option<u64> =
            (!allowed).then(|| window.reset_at.saturating_sub(now).div_ceil(1000));

        Decision {
            allowed,
            limit: self.max,
            remaining: self.max.saturating_sub(window.count),
            reset_at: window.reset_at,
            retry_after_secs,
        }
    }

    /// Drops windows that ended before `now`. Returns how many were removed.
    ///
    /// An expired window would be replaced on the key's next request anyway,
    /// so sweeping never changes a decision.
    pub fn sweep(&self, now: u64) -> usize {
        let mut removed: usize = 0;
        self.windows.retain(|_, window| {
            let live: bool = window.reset_at >= now;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    fn advance(&self, key: &str, now: u64) -> RateWindow {
        let fresh = RateWindow {
            count: 1,
            reset_at: now.saturating_add(self.window_ms),
        };

        *self
            .windows
            .entry(key.to_owned())
            .and_modify(|window| {
                if now <= window.reset_at {
                    window.count = window.count.saturating_add(1);
                } else {
                    *window = fresh;
                }
            })
            .or_insert(fresh)
    }
}

/// Derives the rate-limit key for a request.
///
/// With `trust_proxy`, the first comma-separated `X-Forwarded-For` entry wins when
/// it is non-empty. Otherwise the peer address is used, and failing that the
/// shared [`UNKNOWN_CLIENT`] bucket.
pub fn client_key(trust_proxy: bool, forwarded_for: Option<&str>, peer: Option<IpAddr>) -> String {
    if trust_proxy {
        let forwarded: Option<&str> = forwarded_for
            .and_then(|header| header.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());
        if let Some(first) = forwarded {
            return first.to_string();
        }
    }

    peer.map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
