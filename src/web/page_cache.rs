//! Page Cache Module
//!
//! Serves a recently fetched copy of a page while it is fresh, and counts
//! every request for it.

use std::time::Duration;

use tracing::{debug, warn};

use crate::backend::{check_ttl, SharedBackend};
use crate::config::DEFAULT_PAGE_TTL;
use crate::error::{CacheError, Result};
use crate::web::Fetcher;

/// Backend key of the access counter for `url`.
pub fn access_key(url: &str) -> String {
    format!("count:{}", url)
}

/// Backend key of the cached content for `url`.
pub fn content_key(url: &str) -> String {
    format!("cached:{}", url)
}

// == Page Cache ==
/// Time-bounded cache of remote pages.
///
/// The access counter measures demand: it is incremented on every request,
/// hit or miss, before the cache is consulted.
pub struct PageCache<F> {
    backend: SharedBackend,
    fetcher: F,
    ttl: Duration,
}

impl<F: Fetcher> PageCache<F> {
    // == Constructor ==
    /// Creates a page cache keeping pages for the default 10 seconds.
    pub fn new(backend: SharedBackend, fetcher: F) -> Self {
        Self {
            backend,
            fetcher,
            ttl: Duration::from_secs(DEFAULT_PAGE_TTL),
        }
    }

    /// Overrides how long a fetched page stays cached.
    ///
    /// Fails with `CacheError::InvalidTtl` for TTLs under one millisecond, so
    /// a page is never fetched only to be rejected by the backend.
    pub fn with_ttl(mut self, ttl: Duration) -> Result<Self> {
        check_ttl(ttl)?;
        self.ttl = ttl;
        Ok(self)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // == Get Page ==
    /// Returns the content of `url`, from the cache when a fresh copy exists.
    ///
    /// On a miss the page is fetched and cached for the TTL. A failed fetch
    /// is returned to the caller and leaves the cache untouched.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let accesses = self.backend.incr(&access_key(url)).await?;

        let key = content_key(url);
        if let Some(raw) = self.backend.get(&key).await? {
            debug!("Page cache hit for {} (access #{})", url, accesses);
            return String::from_utf8(raw).map_err(|e| CacheError::Decode(e.to_string()));
        }

        debug!("Page cache miss for {} (access #{})", url, accesses);
        let content = match self.fetcher.fetch(url).await {
            Ok(content) => content,
            Err(err) => {
                warn!("Fetching {} failed: {}", url, err);
                return Err(err);
            }
        };

        self.backend
            .set_ex(&key, content.as_bytes(), self.ttl)
            .await?;
        Ok(content)
    }

    // == Access Count ==
    /// Number of requests made for `url`. Zero if never requested.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        match self.backend.get(&access_key(url)).await? {
            None => Ok(0),
            Some(raw) => String::from_utf8_lossy(&raw)
                .parse()
                .map_err(|e| CacheError::Decode(format!("access counter for {}: {}", url, e))),
        }
    }
}
