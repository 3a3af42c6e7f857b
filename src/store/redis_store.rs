//! Redis Store
//!
//! Production backend over a single multiplexed `ConnectionManager`.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};
use tracing::info;

use super::{ObjectStore, ScoredMember};
use crate::error::{FacadeError, Result};

const HASH_PUT_SCRIPT: &str = r#"
local prev = redis.call('HGET', KEYS[1], ARGV[1])
redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
return prev
"#;

const HASH_REMOVE_SCRIPT: &str = r#"
local prev = redis.call('HGET', KEYS[1], ARGV[1])
if prev then
    redis.call('HDEL', KEYS[1], ARGV[1])
end
return prev
"#;

// == Redis Store ==
/// Store backed by a remote Redis server.
///
/// Cloning is cheap; all clones share the same underlying connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    hash_put: Script,
    hash_remove: Script,
}

impl RedisStore {
    /// Opens the connection and checks the server answers `PING`.
    ///
    /// Both a malformed URL and an unreachable server are reported as
    /// `FacadeError::Config`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(|error| {
            FacadeError::Config(format!("redis connection config error: {}", error))
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|error| {
            FacadeError::Config(format!("redis connection to {} failed: {}", url, error))
        })?;

        let store = Self {
            conn,
            hash_put: Script::new(HASH_PUT_SCRIPT),
            hash_remove: Script::new(HASH_REMOVE_SCRIPT),
        };
        store.ping().await.map_err(|error| {
            FacadeError::Config(format!("redis at {} did not answer PING: {}", url, error))
        })?;

        info!("Connected to redis at {}", url);
        Ok(store)
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl ObjectStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> Result<()> {
        let _: String = redis::cmd("PING").query_async(&mut self.conn()).await?;
        Ok(())
    }

    // == Strings ==
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.conn().get(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            // PX rejects 0, so sub-millisecond TTLs round up
            let millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX).max(1);
            cmd.arg("PX").arg(millis);
        }
        let _: () = cmd.query_async(&mut self.conn()).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.conn().exists(key).await?)
    }

    async fn ttl_ms(&self, key: &str) -> Result<Option<u64>> {
        // -2 = absent, -1 = no expiry
        let ttl: i64 = redis::cmd("PTTL").arg(key).query_async(&mut self.conn()).await?;
        Ok(u64::try_from(ttl).ok())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let removed: i64 = self.conn().del(key).await?;
        Ok(removed > 0)
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        Ok(self.conn().incr(key, delta).await?)
    }

    async fn incr_by_float(&self, key: &str, delta: f64) -> Result<f64> {
        Ok(self.conn().incr(key, delta).await?)
    }

    // == Bitmaps ==
    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool> {
        let bit: i64 = redis::cmd("GETBIT")
            .arg(key)
            .arg(offset)
            .query_async(&mut self.conn())
            .await?;
        Ok(bit == 1)
    }

    async fn set_bit(&self, key: &str, offset: u64, value: bool) -> Result<bool> {
        let prev: i64 = redis::cmd("SETBIT")
            .arg(key)
            .arg(offset)
            .arg(u8::from(value))
            .query_async(&mut self.conn())
            .await?;
        Ok(prev == 1)
    }

    // == Hashes ==
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>> {
        Ok(self.conn().hgetall(key).await?)
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>> {
        Ok(self.conn().hget(key, field).await?)
    }

    async fn hash_put(&self, key: &str, field: &str, value: &str) -> Result<Option<String>> {
        let prev: Option<String> = self
            .hash_put
            .key(key)
            .arg(field)
            .arg(value)
            .invoke_async(&mut self.conn())
            .await?;
        Ok(prev)
    }

    async fn hash_remove(&self, key: &str, field: &str) -> Result<Option<String>> {
        let prev: Option<String> = self
            .hash_remove
            .key(key)
            .arg(field)
            .invoke_async(&mut self.conn())
            .await?;
        Ok(prev)
    }

    // == Sets ==
    async fn set_members(&self, key: &str) -> Result<HashSet<String>> {
        Ok(self.conn().smembers(key).await?)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool> {
        let added: i64 = self.conn().sadd(key, member).await?;
        Ok(added > 0)
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool> {
        let removed: i64 = self.conn().srem(key, member).await?;
        Ok(removed > 0)
    }

    // == Sorted sets ==
    async fn zset_range(&self, key: &str) -> Result<Vec<ScoredMember>> {
        let pairs: Vec<(String, f64)> = self.conn().zrange_withscores(key, 0, -1).await?;
        Ok(pairs
            .into_iter()
            .map(|(member, score)| ScoredMember { member, score })
            .collect())
    }

    async fn zset_add(&self, key: &str, member: &str, score: f64) -> Result<bool> {
        let added: i64 = self.conn().zadd(key, member, score).await?;
        Ok(added > 0)
    }

    async fn zset_remove(&self, key: &str, member: &str) -> Result<bool> {
        let removed: i64 = self.conn().zrem(key, member).await?;
        Ok(removed > 0)
    }

    async fn zset_rank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        Ok(self.conn().zrank(key, member).await?)
    }

    async fn zset_score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        Ok(self.conn().zscore(key, member).await?)
    }

    // == Lists ==
    async fn list_range(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.conn().lrange(key, 0, -1).await?)
    }

    async fn list_push(&self, key: &str, value: &str) -> Result<u64> {
        Ok(self.conn().rpush(key, value).await?)
    }

    async fn list_remove(&self, key: &str, value: &str) -> Result<bool> {
        let removed: i64 = redis::cmd("LREM")
            .arg(key)
            .arg(1)
            .arg(value)
            .query_async(&mut self.conn())
            .await?;
        Ok(removed > 0)
    }

    async fn list_index(&self, key: &str, index: i64) -> Result<Option<String>> {
        let value: Option<String> = redis::cmd("LINDEX")
            .arg(key)
            .arg(index)
            .query_async(&mut self.conn())
            .await?;
        Ok(value)
    }

    async fn list_pop_front(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = redis::cmd("LPOP")
            .arg(key)
            .query_async(&mut self.conn())
            .await?;
        Ok(value)
    }
}
