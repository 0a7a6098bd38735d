//! Remote page transport.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

/// Fetches the body of a remote resource.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

// == HTTP Fetcher ==
/// Fetcher issuing plain HTTP GET requests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Fetch(format!("{} returned {}", url, status)));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();

        // Nothing listens on port 1
        let result = fetcher.fetch("http://127.0.0.1:1/").await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();

        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }
}
