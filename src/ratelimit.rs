//! Fixed-window rate limiter for deployments that front the store with
//! an API (login and token endpoints).
//!
//! A bounded concurrent map of per-key counters with explicit reset
//! timestamps.  When the map reaches its capacity bound, expired entries
//! are pruned before a new key is admitted, so the memory footprint
//! cannot grow without limit.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default number of requests allowed per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Default bound on the number of tracked keys.
pub const DEFAULT_CAPACITY: usize = 10_000;

struct Counter {
    count: u32,
    reset_at: Instant,
}

/// Per-key fixed-window request limiter.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    capacity: usize,
    counters: Mutex<HashMap<String, Counter>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_REQUESTS, DEFAULT_CAPACITY)
    }
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32, capacity: usize) -> Self {
        Self {
            window,
            max_requests,
            capacity,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request for `key` (typically a client IP).
    ///
    /// Returns `true` if the request is within the window's allowance.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(counter) = counters.get_mut(key) {
            if now >= counter.reset_at {
                counter.count = 1;
                counter.reset_at = now + self.window;
                return true;
            }
            counter.count += 1;
            return counter.count <= self.max_requests;
        }

        if counters.len() >= self.capacity {
            counters.retain(|_, c| now < c.reset_at);
            // Still full after pruning: refuse rather than grow unbounded.
            if counters.len() >= self.capacity {
                return false;
            }
        }

        counters.insert(
            key.to_string(),
            Counter {
                count: 1,
                reset_at: now + self.window,
            },
        );
        true
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.counters.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_max_then_blocks() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3, 100);

        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1, 100);

        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1, 100);
        let start = Instant::now();

        assert!(limiter.check_at("a", start));
        assert!(!limiter.check_at("a", start + Duration::from_secs(30)));
        assert!(limiter.check_at("a", start + Duration::from_secs(61)));
    }

    #[test]
    fn capacity_bound_prunes_expired_entries() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 5, 2);
        let start = Instant::now();

        assert!(limiter.check_at("a", start));
        assert!(limiter.check_at("b", start));
        assert_eq!(limiter.tracked_keys(), 2);

        // Map is full and nothing has expired: new keys are refused.
        assert!(!limiter.check_at("c", start + Duration::from_secs(1)));

        // After the window passes, expired entries are pruned to make room.
        assert!(limiter.check_at("c", start + Duration::from_secs(61)));
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
