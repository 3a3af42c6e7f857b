//! Connection Provider
//!
//! Opens the one store handle the process shares. The handle is passed
//! explicitly to the façade; nothing looks it up globally.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::store::{MemoryStore, ObjectStore, RedisStore};
use crate::tasks::spawn_cleanup_task;

/// The shared store handle plus any background task it owns.
pub struct Connection {
    pub store: Arc<dyn ObjectStore>,
    /// Expiry sweep of the memory backend
    pub cleanup: Option<JoinHandle<()>>,
}

impl Connection {
    /// Stops background work tied to the store.
    pub fn shutdown(&self) {
        if let Some(cleanup) = &self.cleanup {
            cleanup.abort();
        }
    }
}

/// Connects to the configured backend.
///
/// Fails with `FacadeError::Config` when the Redis URL is malformed or the
/// server cannot be reached.
pub async fn connect(config: &Config) -> Result<Connection> {
    info!("Connecting to {} store", config.backend.as_str());

    match config.backend {
        StoreBackend::Redis => {
            let store = RedisStore::connect(&config.redis_url).await?;
            Ok(Connection {
                store: Arc::new(store),
                cleanup: None,
            })
        }
        StoreBackend::Memory => {
            let memory = Arc::new(MemoryStore::new());
            let cleanup = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
            Ok(Connection {
                store: memory,
                cleanup: Some(cleanup),
            })
        }
    }
}
