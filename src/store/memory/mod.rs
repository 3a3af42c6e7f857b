//! Memory Store Module
//!
//! In-process backend mirroring the Redis semantics of the commands the
//! façade uses. Expired keys are dropped lazily on access and periodically by
//! the sweep task in `tasks::cleanup`.

mod entry;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use redis::{ErrorKind, RedisError};
use tokio::sync::RwLock;

use super::{ObjectStore, ScoredMember};
use crate::error::{FacadeError, Result};

use entry::{Entry, StoredValue};

/// Redis caps bitmaps at 512 MB.
const MAX_BIT_OFFSET: u64 = 1 << 32;

type Keyspace = HashMap<String, Entry>;

// == Store Errors ==
fn store_error(message: &'static str) -> FacadeError {
    RedisError::from((ErrorKind::TypeError, message)).into()
}

fn wrong_type() -> FacadeError {
    store_error("WRONGTYPE Operation against a key holding the wrong kind of value")
}

fn not_integer() -> FacadeError {
    store_error("value is not an integer or out of range")
}

fn not_float() -> FacadeError {
    store_error("value is not a valid float")
}

// == Keyspace Helpers ==
/// Returns the entry under `key`, dropping it first if it has expired.
fn live<'a>(entries: &'a mut Keyspace, key: &str) -> Option<&'a mut Entry> {
    if entries.get(key).is_some_and(Entry::is_expired) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

/// Returns the live entry under `key`, creating it from `init` when absent.
fn live_or_insert<'a>(
    entries: &'a mut Keyspace,
    key: &str,
    init: impl FnOnce() -> StoredValue,
) -> &'a mut Entry {
    if entries.get(key).is_some_and(Entry::is_expired) {
        entries.remove(key);
    }
    entries
        .entry(key.to_string())
        .or_insert_with(|| Entry::persistent(init()))
}

fn remove_if_empty(entries: &mut Keyspace, key: &str) {
    if entries
        .get(key)
        .is_some_and(|entry| entry.value.is_empty_collection())
    {
        entries.remove(key);
    }
}

fn zset_order(existing: &ScoredMember, score: f64, member: &str) -> Ordering {
    existing
        .score
        .total_cmp(&score)
        .then_with(|| existing.member.as_str().cmp(member))
}

fn bit_mask(offset: u64) -> (usize, u8) {
    ((offset / 8) as usize, 0x80u8 >> (offset % 8))
}

// == Memory Store ==
/// Keyspace held behind a single async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Keyspace>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    /// Number of keys currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    // == Strings ==
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(None),
            Some(Entry {
                value: StoredValue::Bytes(bytes),
                ..
            }) => String::from_utf8(bytes.clone())
                .map(Some)
                .map_err(|_| store_error("Invalid UTF-8 in stored value")),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry::new(StoredValue::Bytes(value.as_bytes().to_vec()), ttl),
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(live(&mut entries, key).is_some())
    }

    async fn ttl_ms(&self, key: &str) -> Result<Option<u64>> {
        let mut entries = self.entries.write().await;
        Ok(live(&mut entries, key).and_then(|entry| entry.ttl_remaining_ms()))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let existed = live(&mut entries, key).is_some();
        entries.remove(key);
        Ok(existed)
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut entries = self.entries.write().await;
        let entry = live_or_insert(&mut entries, key, || StoredValue::Bytes(b"0".to_vec()));
        let StoredValue::Bytes(bytes) = &mut entry.value else {
            return Err(wrong_type());
        };

        let current: i64 = std::str::from_utf8(bytes.as_slice())
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(not_integer)?;
        let next = current
            .checked_add(delta)
            .ok_or_else(|| store_error("increment or decrement would overflow"))?;

        *bytes = next.to_string().into_bytes();
        Ok(next)
    }

    async fn incr_by_float(&self, key: &str, delta: f64) -> Result<f64> {
        let mut entries = self.entries.write().await;
        let entry = live_or_insert(&mut entries, key, || StoredValue::Bytes(b"0".to_vec()));
        let StoredValue::Bytes(bytes) = &mut entry.value else {
            return Err(wrong_type());
        };

        let current: f64 = std::str::from_utf8(bytes.as_slice())
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .ok_or_else(not_float)?;
        let next = current + delta;
        if !next.is_finite() {
            return Err(store_error("increment would produce NaN or Infinity"));
        }

        *bytes = next.to_string().into_bytes();
        Ok(next)
    }

    // == Bitmaps ==
    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(false),
            Some(Entry {
                value: StoredValue::Bytes(bytes),
                ..
            }) => {
                let (byte, mask) = bit_mask(offset);
                Ok(bytes.get(byte).is_some_and(|b| b & mask != 0))
            }
            Some(_) => Err(wrong_type()),
        }
    }

    async fn set_bit(&self, key: &str, offset: u64, value: bool) -> Result<bool> {
        if offset >= MAX_BIT_OFFSET {
            return Err(store_error("bit offset is not an integer or out of range"));
        }

        let mut entries = self.entries.write().await;
        let entry = live_or_insert(&mut entries, key, || StoredValue::Bytes(Vec::new()));
        let StoredValue::Bytes(bytes) = &mut entry.value else {
            return Err(wrong_type());
        };

        let (byte, mask) = bit_mask(offset);
        if bytes.len() <= byte {
            bytes.resize(byte + 1, 0);
        }
        let prev = bytes[byte] & mask != 0;
        if value {
            bytes[byte] |= mask;
        } else {
            bytes[byte] &= !mask;
        }
        Ok(prev)
    }

    // == Hashes ==
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(HashMap::new()),
            Some(Entry {
                value: StoredValue::Hash(map),
                ..
            }) => Ok(map.clone()),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(None),
            Some(Entry {
                value: StoredValue::Hash(map),
                ..
            }) => Ok(map.get(field).cloned()),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn hash_put(&self, key: &str, field: &str, value: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        let entry = live_or_insert(&mut entries, key, || StoredValue::Hash(HashMap::new()));
        let StoredValue::Hash(map) = &mut entry.value else {
            return Err(wrong_type());
        };
        Ok(map.insert(field.to_string(), value.to_string()))
    }

    async fn hash_remove(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        let removed = match live(&mut entries, key) {
            None => None,
            Some(Entry {
                value: StoredValue::Hash(map),
                ..
            }) => map.remove(field),
            Some(_) => return Err(wrong_type()),
        };
        remove_if_empty(&mut entries, key);
        Ok(removed)
    }

    // == Sets ==
    async fn set_members(&self, key: &str) -> Result<HashSet<String>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(HashSet::new()),
            Some(Entry {
                value: StoredValue::Set(set),
                ..
            }) => Ok(set.clone()),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let entry = live_or_insert(&mut entries, key, || StoredValue::Set(HashSet::new()));
        let StoredValue::Set(set) = &mut entry.value else {
            return Err(wrong_type());
        };
        Ok(set.insert(member.to_string()))
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let removed = match live(&mut entries, key) {
            None => false,
            Some(Entry {
                value: StoredValue::Set(set),
                ..
            }) => set.remove(member),
            Some(_) => return Err(wrong_type()),
        };
        remove_if_empty(&mut entries, key);
        Ok(removed)
    }

    // == Sorted sets ==
    async fn zset_range(&self, key: &str) -> Result<Vec<ScoredMember>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(Vec::new()),
            Some(Entry {
                value: StoredValue::ZSet(members),
                ..
            }) => Ok(members.clone()),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn zset_add(&self, key: &str, member: &str, score: f64) -> Result<bool> {
        if score.is_nan() {
            return Err(not_float());
        }

        let mut entries = self.entries.write().await;
        let entry = live_or_insert(&mut entries, key, || StoredValue::ZSet(Vec::new()));
        let StoredValue::ZSet(members) = &mut entry.value else {
            return Err(wrong_type());
        };

        let added = match members.iter().position(|m| m.member == member) {
            Some(pos) => {
                members.remove(pos);
                false
            }
            None => true,
        };
        let at = members.partition_point(|m| zset_order(m, score, member) == Ordering::Less);
        members.insert(
            at,
            ScoredMember {
                member: member.to_string(),
                score,
            },
        );
        Ok(added)
    }

    async fn zset_remove(&self, key: &str, member: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let removed = match live(&mut entries, key) {
            None => false,
            Some(Entry {
                value: StoredValue::ZSet(members),
                ..
            }) => match members.iter().position(|m| m.member == member) {
                Some(pos) => {
                    members.remove(pos);
                    true
                }
                None => false,
            },
            Some(_) => return Err(wrong_type()),
        };
        remove_if_empty(&mut entries, key);
        Ok(removed)
    }

    async fn zset_rank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(None),
            Some(Entry {
                value: StoredValue::ZSet(members),
                ..
            }) => Ok(members
                .iter()
                .position(|m| m.member == member)
                .map(|pos| pos as u64)),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn zset_score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(None),
            Some(Entry {
                value: StoredValue::ZSet(members),
                ..
            }) => Ok(members.iter().find(|m| m.member == member).map(|m| m.score)),
            Some(_) => Err(wrong_type()),
        }
    }

    // == Lists ==
    async fn list_range(&self, key: &str) -> Result<Vec<String>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(Vec::new()),
            Some(Entry {
                value: StoredValue::List(list),
                ..
            }) => Ok(list.iter().cloned().collect()),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn list_push(&self, key: &str, value: &str) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let entry = live_or_insert(&mut entries, key, || StoredValue::List(VecDeque::new()));
        let StoredValue::List(list) = &mut entry.value else {
            return Err(wrong_type());
        };
        list.push_back(value.to_string());
        Ok(list.len() as u64)
    }

    async fn list_remove(&self, key: &str, value: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let removed = match live(&mut entries, key) {
            None => false,
            Some(Entry {
                value: StoredValue::List(list),
                ..
            }) => match list.iter().position(|item| item == value) {
                Some(pos) => list.remove(pos).is_some(),
                None => false,
            },
            Some(_) => return Err(wrong_type()),
        };
        remove_if_empty(&mut entries, key);
        Ok(removed)
    }

    async fn list_index(&self, key: &str, index: i64) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(None),
            Some(Entry {
                value: StoredValue::List(list),
                ..
            }) => {
                let len = list.len() as i64;
                let resolved = if index < 0 { len + index } else { index };
                if resolved < 0 || resolved >= len {
                    Ok(None)
                } else {
                    Ok(list.get(resolved as usize).cloned())
                }
            }
            Some(_) => Err(wrong_type()),
        }
    }

    async fn list_pop_front(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        let popped = match live(&mut entries, key) {
            None => None,
            Some(Entry {
                value: StoredValue::List(list),
                ..
            }) => list.pop_front(),
            Some(_) => return Err(wrong_type()),
        };
        remove_if_empty(&mut entries, key);
        Ok(popped)
    }
}
