//! Rate limiter for preventing brute force login attempts

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed
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

/// Rate limiter entry
#[derive(Debug)]
struct RateLimiterEntry {
    /// Number of attempts
    attempts: u32,
    /// Last attempt time
    last_attempt: Instant,
    /// Ban expiration time
    ban_expires: Option<Instant>,
}

/// In-memory rate limiter keyed by an arbitrary string (login email here)
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Rate limiter configuration
    config: RateLimiterConfig,
    /// Rate limiter entries
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

    /// Check if a key is allowed to make a request
    pub async fn is_allowed(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        // Sweep entries whose window has lapsed without an active ban, so
        // abandoned keys don't accumulate
        let window = Duration::from_secs(self.config.window_seconds);
        entries.retain(|_, entry| {
            entry.ban_expires.is_some_and(|expires| now < expires)
                || now.duration_since(entry.last_attempt) < window
        });

        let entry = entries.entry(key.to_string()).or_insert(RateLimiterEntry {
            attempts: 0,
            last_attempt: now,
            ban_expires: None,
        });

        // Check if ban has expired
        if let Some(ban_expires) = entry.ban_expires {
            if now >= ban_expires {
                // Ban expired, reset attempts
                entry.attempts = 0;
                entry.ban_expires = None;
            } else {
                // Still banned
                return Ok(false);
            }
        }

        // Check if we're over the limit
        if entry.attempts >= self.config.max_attempts {
            // Ban the key
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            info!(
                "Banned key {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return Ok(false);
        }

        // Increment attempts
        entry.attempts += 1;
        entry.last_attempt = now;

        Ok(true)
    }

    /// Get the rate limiter configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
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

    #[tokio::test]
    async fn allows_up_to_max_attempts_then_bans() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 3,
            window_seconds: 300,
            ban_duration_seconds: 3600,
        });

        for _ in 0..3 {
            assert!(limiter.is_allowed("login:ada@example.com").await.unwrap());
        }

        // Fourth attempt trips the ban
        assert!(!limiter.is_allowed("login:ada@example.com").await.unwrap());
        // And stays banned
        assert!(!limiter.is_allowed("login:ada@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn stale_keys_are_swept() {
        // A zero-second window makes every unbanned entry stale immediately
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 5,
            window_seconds: 0,
            ban_duration_seconds: 3600,
        });

        assert!(limiter.is_allowed("login:a@example.com").await.unwrap());
        assert!(limiter.is_allowed("login:b@example.com").await.unwrap());

        // The first key lapsed before the second call and was dropped
        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[tokio::test]
    async fn keys_are_limited_independently() {
        let limiter = RateLimiter::new(RateLimiterConfig {
            max_attempts: 1,
            window_seconds: 300,
            ban_duration_seconds: 3600,
        });

        assert!(limiter.is_allowed("login:a@example.com").await.unwrap());
        assert!(!limiter.is_allowed("login:a@example.com").await.unwrap());
        assert!(limiter.is_allowed("login:b@example.com").await.unwrap());
    }
}
