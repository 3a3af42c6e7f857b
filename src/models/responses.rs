//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies. Absent values
//! serialize as `null`.

use std::collections::HashMap;

use serde::Serialize;

use crate::store::ScoredMember;

/// Value read from a bucket, list or queue
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    pub key: String,
    pub value: Option<String>,
}

impl ValueResponse {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /bucket/:key
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /bucket/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    /// Whether anything was actually removed
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        Self {
            key: key.into(),
            deleted,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

impl ExistsResponse {
    pub fn new(key: impl Into<String>, exists: bool) -> Self {
        Self {
            key: key.into(),
            exists,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    /// Milliseconds left, `null` when absent or persistent
    pub ttl_ms: Option<u64>,
}

impl TtlResponse {
    pub fn new(key: impl Into<String>, ttl_ms: Option<u64>) -> Self {
        Self {
            key: key.into(),
            ttl_ms,
        }
    }
}

/// Bit read, or the previous bit for a write
#[derive(Debug, Clone, Serialize)]
pub struct BitResponse {
    pub key: String,
    pub index: u64,
    pub value: bool,
}

impl BitResponse {
    pub fn new(key: impl Into<String>, index: u64, value: bool) -> Self {
        Self {
            key: key.into(),
            index,
            value,
        }
    }
}

/// Integer counter value (atomic long, adder)
#[derive(Debug, Clone, Serialize)]
pub struct CounterResponse {
    pub key: String,
    pub value: i64,
}

impl CounterResponse {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoubleResponse {
    pub key: String,
    pub value: f64,
}

impl DoubleResponse {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MapResponse {
    pub key: String,
    pub entries: HashMap<String, String>,
}

impl MapResponse {
    pub fn new(key: impl Into<String>, entries: HashMap<String, String>) -> Self {
        Self {
            key: key.into(),
            entries,
        }
    }
}

/// A single map field; `value` is the current, previous or removed value
/// depending on the operation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldResponse {
    pub key: String,
    pub field: String,
    pub value: Option<String>,
}

impl FieldResponse {
    pub fn new(key: impl Into<String>, field: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            field: field.into(),
            value,
        }
    }
}

/// Members of a set, sorted set or list
#[derive(Debug, Clone, Serialize)]
pub struct MembersResponse {
    pub key: String,
    pub members: Vec<String>,
}

impl MembersResponse {
    pub fn new(key: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            key: key.into(),
            members,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredMembersResponse {
    pub key: String,
    pub members: Vec<ScoredMember>,
}

impl ScoredMembersResponse {
    pub fn new(key: impl Into<String>, members: Vec<ScoredMember>) -> Self {
        Self {
            key: key.into(),
            members,
        }
    }
}

/// Outcome of an add/remove that reports whether the collection changed
#[derive(Debug, Clone, Serialize)]
pub struct ChangedResponse {
    pub key: String,
    pub changed: bool,
}

impl ChangedResponse {
    pub fn new(key: impl Into<String>, changed: bool) -> Self {
        Self {
            key: key.into(),
            changed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub key: String,
    pub member: String,
    pub rank: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub key: String,
    pub member: String,
    pub score: Option<f64>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Store backend in use
    pub backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(backend: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            backend: backend.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
