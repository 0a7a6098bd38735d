//! Configuration Module
//!
//! Handles loading backend and page cache settings from environment variables.

use std::env;
use std::time::Duration;

/// Default TTL in seconds for cached pages
pub const DEFAULT_PAGE_TTL: u64 = 10;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection URL of the Redis server
    pub redis_url: String,
    /// Lifetime in seconds of a cached page
    pub page_ttl: u64,
    /// Timeout in seconds for a remote page fetch
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379/)
    /// - `PAGE_CACHE_TTL` - Cached page lifetime in seconds, zero ignored (default: 10)
    /// - `FETCH_TIMEOUT` - Remote fetch timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            page_ttl: env::var("PAGE_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&ttl| ttl > 0)
                .unwrap_or(defaults.page_ttl),
            fetch_timeout: env::var("FETCH_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout),
        }
    }

    /// Page TTL as a Duration.
    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_ttl)
    }

    /// Fetch timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379/".to_string(),
            page_ttl: DEFAULT_PAGE_TTL,
            fetch_timeout: 30,
        }
    }
}
