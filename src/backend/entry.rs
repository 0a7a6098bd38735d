//! Stored Entry Module
//!
//! Defines the in-memory representation of a backend key with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Slot ==
/// The two value shapes the backend stores.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// A plain byte string
    Scalar(Vec<u8>),
    /// An ordered list of byte strings
    List(Vec<Vec<u8>>),
}

// == Stored Entry ==
/// A single backend key: its value and optional expiry.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored value
    pub slot: Slot,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoredEntry {
    // == Constructors ==
    /// Creates a scalar entry with no expiry.
    pub fn scalar(value: Vec<u8>) -> Self {
        Self {
            slot: Slot::Scalar(value),
            expires_at: None,
        }
    }

    /// Creates a scalar entry that expires after `ttl`.
    pub fn expiring(value: Vec<u8>, ttl: Duration) -> Self {
        Self {
            slot: Slot::Scalar(value),
            expires_at: Some(current_timestamp_ms() + ttl.as_millis() as u64),
        }
    }

    /// Creates an empty list entry.
    pub fn list() -> Self {
        Self {
            slot: Slot::List(Vec::new()),
            expires_at: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_scalar_never_expires() {
        let entry = StoredEntry::scalar(b"value".to_vec());

        assert_eq!(entry.slot, Slot::Scalar(b"value".to_vec()));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiring_entry() {
        let entry = StoredEntry::expiring(b"value".to_vec(), Duration::from_secs(1));

        assert!(!entry.is_expired());

        // Wait for expiration
        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = StoredEntry {
            slot: Slot::Scalar(b"test".to_vec()),
            expires_at: Some(now),
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }

    #[test]
    fn test_list_starts_empty() {
        let entry = StoredEntry::list();
        assert_eq!(entry.slot, Slot::List(Vec::new()));
        assert!(!entry.is_expired());
    }
}
