//! Facade Module
//!
//! Typed accessors over the store's data types. Every operation is a single
//! delegation to the [`ObjectStore`]; atomicity is whatever the store gives.

mod adder;
mod options;


use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{FacadeError, Result};
use crate::store::{ObjectStore, ScoredMember};

pub use adder::LongAdders;
pub use options::{SetOptions, TtlUnit, DEFAULT_TTL_SECS};

/// Reads a stored counter, treating an absent key as zero.
fn parse_counter<T>(key: &str, raw: Option<String>) -> Result<T>
where
    T: std::str::FromStr + Default,
{
    match raw {
        None => Ok(T::default()),
        Some(text) => text.trim().parse().map_err(|_| {
            FacadeError::Store(redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "value is not a number",
                format!("key '{}' holds {:?}", key, text),
            )))
        }),
    }
}

// == Object Facade ==
/// Entry point for every typed store operation.
///
/// Cloning is cheap: clones share the store handle and the adder accumulators.
#[derive(Clone)]
pub struct ObjectFacade {
    store: Arc<dyn ObjectStore>,
    adders: Arc<LongAdders>,
}

impl ObjectFacade {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            adders: Arc::new(LongAdders::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    // == Bucket ==
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        debug!("bucket get: key={}", key);
        self.store.get(key).await
    }

    /// Stores `value` under `key`, replacing any previous value and expiry.
    pub async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<()> {
        let expiry = options.expiry();
        debug!("bucket set: key={}, expiry={:?}", key, expiry);
        self.store.set(key, value, expiry).await
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.store.exists(key).await
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        debug!("bucket delete: key={}", key);
        self.store.delete(key).await
    }

    /// Milliseconds until `key` expires; `None` when absent or persistent.
    pub async fn remaining_ttl_ms(&self, key: &str) -> Result<Option<u64>> {
        self.store.ttl_ms(key).await
    }

    /// Non-blocking variant of [`ObjectFacade::get`].
    ///
    /// The read runs on its own task and logs its outcome when it completes.
    /// Awaiting the handle yields the value; dropping it leaves the read to
    /// finish in the background.
    pub fn get_detached(&self, key: &str) -> JoinHandle<Result<Option<String>>> {
        let facade = self.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            let result = facade.get(&key).await;
            match &result {
                Ok(value) => info!("detached get completed: key={}, value={:?}", key, value),
                Err(error) => warn!("detached get failed: key={}, error={}", key, error),
            }
            result
        })
    }

    // == Bit Set ==
    pub async fn get_bit(&self, key: &str, index: u64) -> Result<bool> {
        self.store.get_bit(key, index).await
    }

    /// Sets the bit at `index`, returning its previous state.
    pub async fn set_bit(&self, key: &str, index: u64, value: bool) -> Result<bool> {
        debug!("bitset set: key={}, index={}, value={}", key, index, value);
        self.store.set_bit(key, index, value).await
    }

    // == Atomic Long ==
    /// Increments the counter and returns the new value.
    ///
    /// With `init`, the counter is first overwritten with `init` and then
    /// incremented. These are two separate store calls: a concurrent writer
    /// can land between them.
    pub async fn increment_and_get(&self, key: &str, init: Option<i64>) -> Result<i64> {
        debug!("atomic long increment: key={}, init={:?}", key, init);
        if let Some(init) = init {
            self.store.set(key, &init.to_string(), None).await?;
        }
        self.store.incr_by(key, 1).await
    }

    /// Current counter value, zero when absent.
    pub async fn get_long(&self, key: &str) -> Result<i64> {
        parse_counter(key, self.store.get(key).await?)
    }

    // == Atomic Double ==
    /// Adds `delta` and returns the new value, with the same `init` rule as
    /// [`ObjectFacade::increment_and_get`].
    pub async fn add_and_get_double(
        &self,
        key: &str,
        delta: f64,
        init: Option<f64>,
    ) -> Result<f64> {
        debug!("atomic double add: key={}, delta={}, init={:?}", key, delta, init);
        if let Some(init) = init {
            self.store.set(key, &init.to_string(), None).await?;
        }
        self.store.incr_by_float(key, delta).await
    }

    pub async fn get_double(&self, key: &str) -> Result<f64> {
        parse_counter(key, self.store.get(key).await?)
    }

    // == Map ==
    pub async fn get_map(&self, key: &str) -> Result<HashMap<String, String>> {
        self.store.hash_get_all(key).await
    }

    pub async fn get_map_field(&self, key: &str, field: &str) -> Result<Option<String>> {
        self.store.hash_get(key, field).await
    }

    /// Returns the value previously held by `field`.
    pub async fn put_map_field(
        &self,
        key: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<String>> {
        debug!("map put: key={}, field={}", key, field);
        self.store.hash_put(key, field, value).await
    }

    /// Returns the removed value; `None` means nothing was removed.
    pub async fn remove_map_field(&self, key: &str, field: &str) -> Result<Option<String>> {
        debug!("map remove: key={}, field={}", key, field);
        self.store.hash_remove(key, field).await
    }

    // == Set ==
    pub async fn get_set(&self, key: &str) -> Result<HashSet<String>> {
        self.store.set_members(key).await
    }

    pub async fn add_set(&self, key: &str, member: &str) -> Result<bool> {
        self.store.set_add(key, member).await
    }

    pub async fn remove_set(&self, key: &str, member: &str) -> Result<bool> {
        self.store.set_remove(key, member).await
    }

    // == Sorted Set ==
    // Lexical order: every member carries score 0, so the store orders by member.

    pub async fn get_sorted_set(&self, key: &str) -> Result<Vec<String>> {
        let members = self.store.zset_range(key).await?;
        Ok(members.into_iter().map(|m| m.member).collect())
    }

    pub async fn add_sorted_set(&self, key: &str, member: &str) -> Result<bool> {
        self.store.zset_add(key, member, 0.0).await
    }

    pub async fn remove_sorted_set(&self, key: &str, member: &str) -> Result<bool> {
        self.store.zset_remove(key, member).await
    }

    // == Scored Sorted Set ==
    pub async fn get_scored_sorted_set(&self, key: &str) -> Result<Vec<ScoredMember>> {
        self.store.zset_range(key).await
    }

    /// Returns true if `member` was new; an existing member is re-scored.
    pub async fn add_scored(&self, key: &str, member: &str, score: f64) -> Result<bool> {
        debug!("scored set add: key={}, member={}, score={}", key, member, score);
        self.store.zset_add(key, member, score).await
    }

    pub async fn remove_scored(&self, key: &str, member: &str) -> Result<bool> {
        self.store.zset_remove(key, member).await
    }

    /// Zero-based position of `member` in score order.
    pub async fn rank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        self.store.zset_rank(key, member).await
    }

    pub async fn score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        self.store.zset_score(key, member).await
    }

    // == List ==
    pub async fn get_list(&self, key: &str) -> Result<Vec<String>> {
        self.store.list_range(key).await
    }

    pub async fn add_list(&self, key: &str, value: &str) -> Result<bool> {
        self.store.list_push(key, value).await?;
        Ok(true)
    }

    /// Removes the first occurrence of `value`.
    pub async fn remove_list(&self, key: &str, value: &str) -> Result<bool> {
        self.store.list_remove(key, value).await
    }

    pub async fn get_list_index(&self, key: &str, index: i64) -> Result<Option<String>> {
        self.store.list_index(key, index).await
    }

    // == Queue ==
    pub async fn add_queue(&self, key: &str, value: &str) -> Result<bool> {
        self.store.list_push(key, value).await?;
        Ok(true)
    }

    /// Head of the queue, left in place.
    pub async fn peek_queue(&self, key: &str) -> Result<Option<String>> {
        self.store.list_index(key, 0).await
    }

    /// Removes and returns the head of the queue.
    pub async fn poll_queue(&self, key: &str) -> Result<Option<String>> {
        debug!("queue poll: key={}", key);
        self.store.list_pop_front(key).await
    }

    // == Long Adder ==
    pub async fn adder_increment(&self, key: &str) {
        self.adders.add(key, 1).await;
    }

    pub async fn adder_decrement(&self, key: &str) {
        self.adders.add(key, -1).await;
    }

    pub async fn adder_add(&self, key: &str, delta: i64) {
        self.adders.add(key, delta).await;
    }

    /// Merges the local delta into the store and returns the total.
    ///
    /// A failed merge puts the delta back so it is not lost.
    pub async fn adder_sum(&self, key: &str) -> Result<i64> {
        let delta = self.adders.take(key).await;
        match self.store.incr_by(key, delta).await {
            Ok(total) => {
                debug!("adder sum: key={}, merged={}, total={}", key, delta, total);
                Ok(total)
            }
            Err(error) => {
                self.adders.add(key, delta).await;
                Err(error)
            }
        }
    }

    /// Forgets the local delta and deletes the stored total.
    pub async fn adder_destroy(&self, key: &str) -> Result<()> {
        self.adders.discard(key).await;
        self.store.delete(key).await?;
        Ok(())
    }
}
