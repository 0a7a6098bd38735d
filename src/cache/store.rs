//! Cache Store Module
//!
//! Stores scalars under generated keys and reads them back. Every store call
//! goes through the history recorder.

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::SharedBackend;
use crate::cache::Value;
use crate::error::{CacheError, Result};
use crate::history::{self, Instrumented, Operation, OperationId, Replay, ReplayReport};

/// Identity the store operation's calls are recorded under.
pub const STORE_OPERATION: &str = "Cache.store";

// == Store Operation ==
/// Writes a value under a fresh UUID and returns that key.
pub struct StoreValue {
    backend: SharedBackend,
}

#[async_trait]
impl Operation for StoreValue {
    type Input = Value;
    type Output = String;

    async fn invoke(&self, value: Value) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.backend.set(&key, &value.to_bytes()).await?;
        Ok(key)
    }
}

// == Cache ==
/// Facade over the backend: instrumented store, plain retrieval.
pub struct Cache {
    backend: SharedBackend,
    store_op: Instrumented<StoreValue>,
    replay: Replay,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `backend`, flushing everything already in it.
    pub async fn new(backend: SharedBackend) -> Result<Self> {
        backend.flush_all().await?;
        info!("Cache initialized, backend flushed");

        let store_op = Instrumented::new(
            STORE_OPERATION,
            backend.clone(),
            StoreValue {
                backend: backend.clone(),
            },
        );

        Ok(Self {
            replay: Replay::new(backend.clone()),
            backend,
            store_op,
        })
    }

    // == Store ==
    /// Persists `value` under a newly generated key and returns the key.
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        self.store_op.invoke(value.into()).await
    }

    // == Get ==
    /// Raw bytes stored under `key`, `None` if nothing is stored there.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key).await
    }

    // == Retrieve ==
    /// Reads `key` and applies `decode` to the raw bytes.
    ///
    /// A missing key yields `Ok(None)`; decode failures are returned as-is.
    pub async fn retrieve<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        match self.backend.get(key).await? {
            Some(raw) => decode(raw).map(Some),
            None => {
                debug!("No value stored under {}", key);
                Ok(None)
            }
        }
    }

    /// Reads `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.retrieve(key, decode_text).await
    }

    /// Reads `key` as a decimal integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.retrieve(key, decode_int).await
    }

    // == History ==
    /// Identity of the instrumented store operation.
    pub fn store_operation(&self) -> &OperationId {
        self.store_op.id()
    }

    /// Number of store calls attempted since the cache was created.
    pub async fn call_count(&self) -> Result<i64> {
        history::call_count(self.backend.as_ref(), self.store_op.id()).await
    }

    /// Recorded history of the store operation.
    pub async fn replay(&self) -> Result<ReplayReport> {
        self.replay.load(self.store_op.id()).await
    }
}

// == Decoders ==
/// Decodes raw bytes as UTF-8 text.
pub fn decode_text(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| CacheError::Decode(e.to_string()))
}

/// Decodes raw bytes as a decimal integer, ignoring surrounding whitespace.
pub fn decode_int(raw: Vec<u8>) -> Result<i64> {
    let text = std::str::from_utf8(&raw).map_err(|e| CacheError::Decode(e.to_string()))?;
    text.trim()
        .parse()
        .map_err(|e| CacheError::Decode(format!("invalid integer '{}': {}", text, e)))
}
