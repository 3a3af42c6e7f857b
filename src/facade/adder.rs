//! Long Adder Module
//!
//! Client-side accumulators for the adder operations. Deltas collect locally
//! and reach the store only when a sum is requested.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

/// Pending per-key deltas not yet merged into the store.
#[derive(Debug, Default)]
pub struct LongAdders {
    pending: RwLock<HashMap<String, Arc<AtomicI64>>>,
}

impl LongAdders {
    pub fn new() -> Self {
        Self::default()
    }

    async fn cell(&self, key: &str) -> Arc<AtomicI64> {
        if let Some(cell) = self.pending.read().await.get(key) {
            return cell.clone();
        }
        self.pending
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Adds `delta` to the local accumulator for `key`.
    pub async fn add(&self, key: &str, delta: i64) {
        self.cell(key).await.fetch_add(delta, Ordering::SeqCst);
    }

    /// Takes the pending delta for `key`, leaving zero behind.
    pub async fn take(&self, key: &str) -> i64 {
        match self.pending.read().await.get(key) {
            Some(cell) => cell.swap(0, Ordering::SeqCst),
            None => 0,
        }
    }

    /// Pending delta for `key` without draining it.
    pub async fn pending(&self, key: &str) -> i64 {
        self.pending
            .read()
            .await
            .get(key)
            .map(|cell| cell.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Drops the accumulator for `key`.
    pub async fn discard(&self, key: &str) {
        self.pending.write().await.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_take() {
        let adders = LongAdders::new();
        adders.add("k", 3).await;
        adders.add("k", -1).await;
        assert_eq!(adders.pending("k").await, 2);
        assert_eq!(adders.take("k").await, 2);
        assert_eq!(adders.take("k").await, 0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let adders = LongAdders::new();
        adders.add("a", 1).await;
        adders.add("b", 10).await;
        adders.discard("a").await;
        assert_eq!(adders.pending("a").await, 0);
        assert_eq!(adders.pending("b").await, 10);
    }

    #[tokio::test]
    async fn test_concurrent_adds() {
        let adders = Arc::new(LongAdders::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let adders = adders.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    adders.add("hits", 1).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(adders.take("hits").await, 1600);
    }
}
