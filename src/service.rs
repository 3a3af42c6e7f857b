//! Demo Service
//!
//! The illustrative calls behind the `/redisson/*` endpoints.

use tracing::info;

use crate::error::{FacadeError, Result};
use crate::facade::{ObjectFacade, SetOptions};

/// Body returned by the fire-and-forget endpoint.
pub const ACK: &str = "1122";

const WRITE_READ_KEY: &str = "name3";
const WRITE_READ_VALUE: &str = "a3";
const WRITE_READ_TTL_SECS: i64 = 20;
const DETACHED_READ_KEY: &str = "name4";

#[derive(Clone)]
pub struct DemoService {
    facade: ObjectFacade,
}

impl DemoService {
    pub fn new(facade: ObjectFacade) -> Self {
        Self { facade }
    }

    /// Writes `name3` with a 20 second TTL and reads it back.
    pub async fn write_then_read(&self) -> Result<String> {
        self.facade
            .set(
                WRITE_READ_KEY,
                WRITE_READ_VALUE,
                SetOptions::with_ttl(WRITE_READ_TTL_SECS),
            )
            .await?;
        Ok(self.facade.get(WRITE_READ_KEY).await?.unwrap_or_default())
    }

    /// Reads `name4` through the detached path and waits for the result.
    pub async fn read_detached(&self) -> Result<String> {
        info!("detached read of {} issued", DETACHED_READ_KEY);
        let handle = self.facade.get_detached(DETACHED_READ_KEY);
        let value = handle
            .await
            .map_err(|error| FacadeError::Internal(format!("detached read failed: {}", error)))??;
        Ok(value.unwrap_or_default())
    }

    /// Starts a read of `key` without waiting for it.
    pub fn read_in_background(&self, key: &str) -> &'static str {
        drop(self.facade.get_detached(key));
        ACK
    }

    /// Value under `key`, empty when absent.
    pub async fn read_value(&self, key: &str) -> Result<String> {
        Ok(self.facade.get(key).await?.unwrap_or_default())
    }
}
