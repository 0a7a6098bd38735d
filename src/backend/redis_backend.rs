//! Redis Backend Module
//!
//! Store adapter over a Redis server reached through a multiplexed tokio
//! connection.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use crate::backend::{check_ttl, KvBackend};
use crate::error::{CacheError, Result};

// == Redis Backend ==
/// Key-value backend talking to a Redis server.
///
/// The underlying connection is multiplexed, so clones share one socket.
#[derive(Clone)]
pub struct RedisBackend {
    conn: MultiplexedConnection,
}

impl RedisBackend {
    // == Connect ==
    /// Opens a connection to the server at `url`.
    ///
    /// Fails with `CacheError::BackendUnavailable` if the URL is malformed or
    /// the server cannot be reached.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::BackendUnavailable(format!("invalid Redis URL: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::BackendUnavailable(e.to_string()))?;

        info!("Connected to Redis at {}", url);
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        Ok(conn.incr(key, 1i64).await?)
    }

    async fn rpush(&self, key: &str, item: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(key, item).await?;
        Ok(())
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut conn = self.conn.clone();
        Ok(conn.lrange(key, start, stop).await?)
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        check_ttl(ttl)?;
        let mut conn = self.conn.clone();
        conn.pset_ex::<_, _, ()>(key, value, ttl.as_millis() as u64)
            .await?;
        Ok(())
    }

    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("FLUSHDB").query_async::<_, ()>(&mut conn).await?;
        info!("Flushed Redis database");
        Ok(())
    }
}
