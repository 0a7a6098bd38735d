//! Call Ledger - an instrumented cache over a Redis-like key-value store
//!
//! Records the call count, inputs and outputs of the store operation so the
//! history can be replayed, and provides an expiring page cache with a
//! per-URL access counter.

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod web;

pub use backend::{KvBackend, MemoryBackend, RedisBackend, SharedBackend};
pub use cache::{Cache, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use history::{Instrumented, Operation, OperationId, Replay, ReplayReport};
pub use web::{HttpFetcher, PageCache};
