//! Store Module
//!
//! The seam between the typed façade and the remote key-value store. Each
//! method maps to one store command; backends must not add semantics of
//! their own on top.

mod memory;
mod redis_store;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

/// A member of a scored sorted set together with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

/// Primitive commands of a Redis-compatible store.
///
/// Absent keys are never errors: reads return `None`, zero or an empty
/// collection. Wrong-type access and connectivity failures surface as the
/// store's own `RedisError`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend name, for logs and health output
    fn name(&self) -> &'static str;

    async fn ping(&self) -> Result<()>;

    // == Strings ==
    async fn get(&self, key: &str) -> Result<Option<String>>;
    /// `ttl` of `None` stores without expiry
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;
    async fn exists(&self, key: &str) -> Result<bool>;
    /// Remaining time to live in milliseconds, `None` if absent or persistent
    async fn ttl_ms(&self, key: &str) -> Result<Option<u64>>;
    /// Returns true if the key existed
    async fn delete(&self, key: &str) -> Result<bool>;
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64>;
    async fn incr_by_float(&self, key: &str, delta: f64) -> Result<f64>;

    // == Bitmaps ==
    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool>;
    /// Returns the previous bit
    async fn set_bit(&self, key: &str, offset: u64, value: bool) -> Result<bool>;

    // == Hashes ==
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>>;
    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>>;
    /// Returns the previous value of the field
    async fn hash_put(&self, key: &str, field: &str, value: &str) -> Result<Option<String>>;
    /// Returns the removed value of the field
    async fn hash_remove(&self, key: &str, field: &str) -> Result<Option<String>>;

    // == Sets ==
    async fn set_members(&self, key: &str) -> Result<HashSet<String>>;
    /// Returns true if the member was added
    async fn set_add(&self, key: &str, member: &str) -> Result<bool>;
    /// Returns true if the member was removed
    async fn set_remove(&self, key: &str, member: &str) -> Result<bool>;

    // == Sorted sets ==
    /// Members ordered by score, ties by member
    async fn zset_range(&self, key: &str) -> Result<Vec<ScoredMember>>;
    /// Returns true if the member was new; an existing member gets its score updated
    async fn zset_add(&self, key: &str, member: &str, score: f64) -> Result<bool>;
    async fn zset_remove(&self, key: &str, member: &str) -> Result<bool>;
    async fn zset_rank(&self, key: &str, member: &str) -> Result<Option<u64>>;
    async fn zset_score(&self, key: &str, member: &str) -> Result<Option<f64>>;

    // == Lists ==
    async fn list_range(&self, key: &str) -> Result<Vec<String>>;
    /// Appends at the tail, returns the new length
    async fn list_push(&self, key: &str, value: &str) -> Result<u64>;
    /// Removes the first occurrence, returns true if one was found
    async fn list_remove(&self, key: &str, value: &str) -> Result<bool>;
    /// Negative indices count from the tail
    async fn list_index(&self, key: &str, index: i64) -> Result<Option<String>>;
    /// Removes and returns the head
    async fn list_pop_front(&self, key: &str) -> Result<Option<String>>;
}
