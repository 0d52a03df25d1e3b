//! Per-client request rate limiting.
//!
//! The gateway depends only on the `RateLimiter` trait; the backing algorithm
//! is a fixed-window counter keyed by client IP. Both the HTTP question
//! endpoint and the WebSocket loop consult the same limiter instance.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Admission decision for one client-identified operation.
pub trait RateLimiter: Send + Sync {
    /// Returns true when the operation is allowed for this client key.
    fn allow(&self, client_key: &str) -> bool;
}

/// In-memory fixed-window counter: up to `max_requests` per `window`, counted
/// from the first request that opened the window.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &docask_core::config::RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn allow(&self, client_key: &str) -> bool {
        let now = Instant::now();
        let mut windows = match self.windows.lock() {
            Ok(w) => w,
            // Poisoned lock: fail open rather than reject every client.
            Err(poisoned) => poisoned.into_inner(),
        };

        match windows.get_mut(client_key) {
            Some((start, count)) if now.duration_since(*start) < self.window => {
                if *count < self.max_requests {
                    *count += 1;
                    true
                } else {
                    false
                }
            }
            _ => {
                windows.insert(client_key.to_string(), (now, 1));
                true
            }
        }
    }
}

/// Limiter that always admits. Used where rate limiting is disabled and in
/// tests that exercise other paths.
pub struct Unlimited;

impl RateLimiter for Unlimited {
    fn allow(&self, _client_key: &str) -> bool {
        true
    }
}
