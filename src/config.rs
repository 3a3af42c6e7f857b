//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Which object store backend the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Remote Redis server reached through `redis_url`
    Redis,
    /// In-process store, for local runs without a Redis server
    Memory,
}

impl StoreBackend {
    /// Parses a backend name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "redis" => Some(StoreBackend::Redis),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Redis => "redis",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL
    pub redis_url: String,
    /// Selected store backend
    pub backend: StoreBackend,
    /// HTTP server port
    pub server_port: u16,
    /// Memory backend expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Store endpoint (default: redis://127.0.0.1:6379)
    /// - `STORE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    ///
    /// An unknown `STORE_BACKEND` is a configuration error.
    pub fn from_env() -> crate::error::Result<Self> {
        let defaults = Self::default();
        let backend = match env::var("STORE_BACKEND") {
            Ok(name) => StoreBackend::parse(&name).ok_or_else(|| {
                crate::error::FacadeError::Config(format!("unknown STORE_BACKEND '{}'", name))
            })?,
            Err(_) => defaults.backend,
        };

        Ok(Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            backend,
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            backend: StoreBackend::Redis,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
