//! Memory Backend Module
//!
//! In-process key-value store with Redis command semantics: lazy TTL
//! expiration, atomic counters and ordered lists.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::{check_ttl, KvBackend, Slot, StoredEntry};
use crate::error::{CacheError, Result};

// == Memory Backend ==
/// Key-value store held in process memory.
///
/// Cloning yields another handle onto the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, StoredEntry>>>,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of live (unexpired) keys.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired()).count()
    }

    // == Is Empty ==
    /// Returns true if no live keys remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Drops `key` if its TTL has elapsed so callers only ever see live entries.
fn purge_expired(entries: &mut HashMap<String, StoredEntry>, key: &str) {
    if entries.get(key).is_some_and(StoredEntry::is_expired) {
        entries.remove(key);
    }
}

fn wrong_type(key: &str) -> CacheError {
    CacheError::Backend(format!(
        "WRONGTYPE operation against key '{}' holding the wrong kind of value",
        key
    ))
}

/// Resolves Redis-style inclusive list bounds against a list of `len` items.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        purge_expired(&mut entries, key);

        match entries.get(key).map(|e| &e.slot) {
            None => Ok(None),
            Some(Slot::Scalar(value)) => Ok(Some(value.clone())),
            Some(Slot::List(_)) => Err(wrong_type(key)),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry::scalar(value.to_vec()));
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        purge_expired(&mut entries, key);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoredEntry::scalar(b"0".to_vec()));

        let current = match &entry.slot {
            Slot::Scalar(raw) => std::str::from_utf8(raw)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| {
                    CacheError::Backend("value is not an integer or out of range".to_string())
                })?,
            Slot::List(_) => return Err(wrong_type(key)),
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::Backend("increment would overflow".to_string()))?;
        entry.slot = Slot::Scalar(next.to_string().into_bytes());
        Ok(next)
    }

    async fn rpush(&self, key: &str, item: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;
        purge_expired(&mut entries, key);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(StoredEntry::list);

        match &mut entry.slot {
            Slot::List(items) => {
                items.push(item.to_vec());
                Ok(())
            }
            Slot::Scalar(_) => Err(wrong_type(key)),
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        purge_expired(&mut entries, key);

        match entries.get(key).map(|e| &e.slot) {
            None => Ok(Vec::new()),
            Some(Slot::List(items)) => Ok(resolve_range(items.len(), start, stop)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(Slot::Scalar(_)) => Err(wrong_type(key)),
        }
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        check_ttl(ttl)?;

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry::expiring(value.to_vec(), ttl));
        Ok(())
    }

    async fn flush_all(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let backend = MemoryBackend::new();

        backend.set("key1", b"value1").await.unwrap();
        let value = backend.get("key1").await.unwrap();

        assert_eq!(value, Some(b"value1".to_vec()));
        assert_eq!(backend.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let backend = MemoryBackend::new();

        backend.set("key1", b"value1").await.unwrap();
        backend.set("key1", b"value2").await.unwrap();

        assert_eq!(backend.get("key1").await.unwrap(), Some(b"value2".to_vec()));
        assert_eq!(backend.len().await, 1);
    }

    #[tokio::test]
    async fn test_incr_from_absent() {
        let backend = MemoryBackend::new();

        assert_eq!(backend.incr("counter").await.unwrap(), 1);
        assert_eq!(backend.incr("counter").await.unwrap(), 2);
        assert_eq!(backend.get("counter").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_incr_non_integer() {
        let backend = MemoryBackend::new();
        backend.set("text", b"hello").await.unwrap();

        let result = backend.incr("text").await;
        assert!(matches!(result, Err(CacheError::Backend(_))));
    }

    #[tokio::test]
    async fn test_concurrent_incr_loses_nothing() {
        let backend = MemoryBackend::new();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let backend = backend.clone();
                tokio::spawn(async move { backend.incr("hits").await.unwrap() })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(backend.get("hits").await.unwrap(), Some(b"50".to_vec()));
    }

    #[tokio::test]
    async fn test_rpush_preserves_order() {
        let backend = MemoryBackend::new();

        backend.rpush("list", b"a").await.unwrap();
        backend.rpush("list", b"b").await.unwrap();
        backend.rpush("list", b"c").await.unwrap();

        let items = backend.lrange("list", 0, -1).await.unwrap();
        assert_eq!(items, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[tokio::test]
    async fn test_lrange_bounds() {
        let backend = MemoryBackend::new();
        for item in [b"a", b"b", b"c", b"d"] {
            backend.rpush("list", item).await.unwrap();
        }

        assert_eq!(
            backend.lrange("list", 1, 2).await.unwrap(),
            vec![b"b".to_vec(), b"c".to_vec()]
        );
        assert_eq!(
            backend.lrange("list", -2, -1).await.unwrap(),
            vec![b"c".to_vec(), b"d".to_vec()]
        );
        assert_eq!(backend.lrange("list", 2, 100).await.unwrap().len(), 2);
        assert!(backend.lrange("list", 3, 1).await.unwrap().is_empty());
        assert!(backend.lrange("list", 10, -1).await.unwrap().is_empty());
        assert!(backend.lrange("missing", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type_access() {
        let backend = MemoryBackend::new();
        backend.rpush("list", b"a").await.unwrap();
        backend.set("scalar", b"x").await.unwrap();

        assert!(matches!(backend.get("list").await, Err(CacheError::Backend(_))));
        assert!(matches!(
            backend.rpush("scalar", b"y").await,
            Err(CacheError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_set_ex_expiration() {
        let backend = MemoryBackend::new();

        backend
            .set_ex("key1", b"value1", Duration::from_secs(1))
            .await
            .unwrap();

        // Should be accessible immediately
        assert!(backend.get("key1").await.unwrap().is_some());

        // Wait for expiration
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(backend.get("key1").await.unwrap(), None);
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_ex_rejects_sub_millisecond_ttl() {
        let backend = MemoryBackend::new();

        let result = backend.set_ex("key1", b"value1", Duration::ZERO).await;
        assert!(matches!(result, Err(CacheError::InvalidTtl(_))));

        let result = backend
            .set_ex("key1", b"value1", Duration::from_micros(500))
            .await;
        assert!(matches!(result, Err(CacheError::InvalidTtl(_))));
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_ex_keeps_sub_second_precision() {
        let backend = MemoryBackend::new();

        backend
            .set_ex("key1", b"value1", Duration::from_millis(300))
            .await
            .unwrap();
        assert!(backend.get("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(backend.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flush_all() {
        let backend = MemoryBackend::new();

        backend.set("key1", b"value1").await.unwrap();
        backend.incr("counter").await.unwrap();
        backend.rpush("list", b"a").await.unwrap();

        backend.flush_all().await.unwrap();

        assert!(backend.is_empty().await);
        assert_eq!(backend.get("counter").await.unwrap(), None);
        assert!(backend.lrange("list", 0, -1).await.unwrap().is_empty());
    }

    #[test]
    fn test_resolve_range() {
        assert_eq!(resolve_range(4, 0, -1), Some((0, 3)));
        assert_eq!(resolve_range(4, -10, 1), Some((0, 1)));
        assert_eq!(resolve_range(0, 0, -1), None);
        assert_eq!(resolve_range(4, -1, -2), None);
    }
}
