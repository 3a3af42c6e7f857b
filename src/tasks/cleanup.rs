//! Expiry Sweep Task
//!
//! Background task that periodically drops expired keys from the in-memory
//! store. Lazy expiry on access already hides them; the sweep frees memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns the sweep loop.
///
/// The returned handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<MemoryStore>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired keys", removed);
            } else {
                debug!("Expiry sweep: no expired keys found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ObjectStore;

    #[tokio::test]
    async fn test_sweep_removes_expired_keys() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("expire_soon", "value", Some(Duration::from_millis(200)))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(store.len().await, 0, "Expired key should have been swept");
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_preserves_live_keys() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("long_lived", "value", Some(Duration::from_secs(3600)))
            .await
            .unwrap();
        store.set("persistent", "value", None).await.unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(store.len().await, 2);
        assert_eq!(
            store.get("long_lived").await.unwrap(),
            Some("value".to_string())
        );
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_can_be_aborted() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn_cleanup_task(store, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
