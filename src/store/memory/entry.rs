//! Memory Entry Module
//!
//! A stored value plus its optional expiration deadline.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::store::ScoredMember;

// == Stored Value ==
/// The value kinds a key can hold, one per store data type.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// Plain string, also addressed bitwise by GETBIT/SETBIT
    Bytes(Vec<u8>),
    Hash(HashMap<String, String>),
    Set(HashSet<String>),
    /// Kept sorted by score, then member
    ZSet(Vec<ScoredMember>),
    List(VecDeque<String>),
}

impl StoredValue {
    /// Collections holding no elements are removed from the keyspace.
    pub fn is_empty_collection(&self) -> bool {
        match self {
            StoredValue::Bytes(_) => false,
            StoredValue::Hash(map) => map.is_empty(),
            StoredValue::Set(set) => set.is_empty(),
            StoredValue::ZSet(members) => members.is_empty(),
            StoredValue::List(list) => list.is_empty(),
        }
    }
}

// == Entry ==
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: StoredValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl Entry {
    pub fn new(value: StoredValue, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| {
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            current_timestamp_ms().saturating_add(millis)
        });
        Self { value, expires_at }
    }

    pub fn persistent(value: StoredValue) -> Self {
        Self::new(value, None)
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Remaining TTL in milliseconds, `Some(0)` once elapsed, `None` without expiry.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = Entry::persistent(StoredValue::Bytes(b"v".to_vec()));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining_ms().is_none());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = Entry::new(
            StoredValue::Bytes(b"v".to_vec()),
            Some(Duration::from_millis(50)),
        );
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining_ms(), Some(0));
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = Entry::new(StoredValue::Bytes(vec![]), Some(Duration::from_secs(10)));
        let remaining = entry.ttl_remaining_ms().unwrap();
        assert!(remaining <= 10_000);
        assert!(remaining >= 9_000);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = Entry::new(StoredValue::Bytes(vec![]), Some(Duration::MAX));
        assert_eq!(entry.expires_at, Some(u64::MAX));
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining_ms().unwrap() > 0);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = Entry {
            value: StoredValue::Bytes(vec![]),
            expires_at: Some(current_timestamp_ms()),
        };
        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }

    #[test]
    fn test_empty_collection() {
        assert!(StoredValue::List(VecDeque::new()).is_empty_collection());
        assert!(!StoredValue::Bytes(vec![]).is_empty_collection());
        let mut set = HashSet::new();
        set.insert("a".to_string());
        assert!(!StoredValue::Set(set).is_empty_collection());
    }
}
