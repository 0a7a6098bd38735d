//! Backend Module
//!
//! The key-value store every other component talks to. `RedisBackend` is the
//! production adapter; `MemoryBackend` reproduces the same command semantics
//! in-process.

mod entry;
mod memory;
mod redis_backend;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

pub use entry::{Slot, StoredEntry};
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;

/// Shared handle to a backend, passed to each component at construction.
pub type SharedBackend = Arc<dyn KvBackend>;

// == Store Adapter ==
/// Minimal command set needed by the cache, history and page cache layers.
///
/// `incr` and `rpush` are atomic at the backend. Every method fails with
/// `CacheError::BackendUnavailable` when the store cannot be reached; nothing
/// here retries.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Reads a scalar value, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes a scalar value with no expiry, replacing whatever was there.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Increments an integer counter by one and returns the new value.
    /// An absent key counts as zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends an item to the tail of a list.
    async fn rpush(&self, key: &str, item: &[u8]) -> Result<()>;

    /// Reads the inclusive range `start..=stop` of a list. Negative indices
    /// count from the end, so `(0, -1)` is the whole list.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Writes a scalar value that disappears after `ttl`.
    ///
    /// The TTL has millisecond precision and must be at least 1 ms; shorter
    /// values are rejected by `check_ttl` before anything is written.
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Removes every key.
    async fn flush_all(&self) -> Result<()>;
}

/// Rejects TTLs the backend cannot express: anything under one millisecond.
pub fn check_ttl(ttl: Duration) -> Result<()> {
    if ttl.as_millis() == 0 {
        return Err(CacheError::InvalidTtl(format!(
            "{:?} is shorter than the 1ms minimum",
            ttl
        )));
    }
    Ok(())
}
