//! Login throttling to slow down password guessing
//!
//! Attempts are counted per key (the normalized email) in a fixed window.
//! Once a key exceeds the limit it is banned for a while; a successful login
//! clears the key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed per window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 3600, // 1 hour
        }
    }
}

#[derive(Debug)]
struct RateLimiterEntry {
    attempts: u32,
    window_start: Instant,
    ban_expires: Option<Instant>,
}

/// Per-key attempt counter shared by all handlers
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for `key` and report whether it may proceed
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_seconds);

        // Keys whose window has lapsed and that carry no live ban hold no state
        entries.retain(|_, entry| {
            entry.ban_expires.is_some_and(|ban_expires| now < ban_expires)
                || now.duration_since(entry.window_start) < window
        });

        let entry = entries
            .entry(key.to_string())
            .or_insert(RateLimiterEntry {
                attempts: 0,
                window_start: now,
                ban_expires: None,
            });

        if let Some(ban_expires) = entry.ban_expires {
            if now < ban_expires {
                return false;
            }
            entry.attempts = 0;
            entry.window_start = now;
            entry.ban_expires = None;
        }

        if now.duration_since(entry.window_start) >= window {
            entry.attempts = 0;
            entry.window_start = now;
        }

        if entry.attempts >= self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            warn!(
                "Throttled login attempts for {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        entry.attempts += 1;
        true
    }

    /// Forget all attempts recorded for `key`
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

#[cfg(test)]
impl RateLimiter {
    async fn tracked_keys(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_attempts: u32, window_seconds: u64, ban_duration_seconds: u64) -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            max_attempts,
            window_seconds,
            ban_duration_seconds,
        })
    }

    #[tokio::test]
    async fn test_bans_after_max_attempts() {
        let limiter = limiter(3, 300, 3600);

        for _ in 0..3 {
            assert!(limiter.is_allowed("a@x.com").await);
        }
        assert!(!limiter.is_allowed("a@x.com").await);
        assert!(!limiter.is_allowed("a@x.com").await);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = limiter(1, 300, 3600);

        assert!(limiter.is_allowed("a@x.com").await);
        assert!(!limiter.is_allowed("a@x.com").await);
        assert!(limiter.is_allowed("b@x.com").await);
    }

    #[tokio::test]
    async fn test_reset_clears_attempts() {
        let limiter = limiter(2, 300, 3600);

        assert!(limiter.is_allowed("a@x.com").await);
        assert!(limiter.is_allowed("a@x.com").await);
        limiter.reset("a@x.com").await;
        assert!(limiter.is_allowed("a@x.com").await);
    }

    #[tokio::test]
    async fn test_stale_keys_are_dropped() {
        let limiter = limiter(5, 0, 0);

        for i in 0..10_000 {
            assert!(limiter.is_allowed(&format!("user{}@x.com", i)).await);
        }

        assert!(limiter.tracked_keys().await <= 1);
    }

    #[tokio::test]
    async fn test_live_keys_are_kept() {
        let limiter = limiter(1, 300, 3600);

        assert!(limiter.is_allowed("a@x.com").await);
        assert!(!limiter.is_allowed("a@x.com").await);
        assert!(limiter.is_allowed("b@x.com").await);

        assert_eq!(limiter.tracked_keys().await, 2);
        assert!(!limiter.is_allowed("a@x.com").await);
    }

    #[tokio::test]
    async fn test_ban_expires() {
        let limiter = limiter(1, 300, 0);

        assert!(limiter.is_allowed("a@x.com").await);
        assert!(!limiter.is_allowed("a@x.com").await);
        // Zero-length ban has already lapsed
        assert!(limiter.is_allowed("a@x.com").await);
    }
}
