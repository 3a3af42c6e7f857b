//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::facade::{SetOptions, TtlUnit};

/// Request body for PUT /bucket/:key
///
/// # Fields
/// - `value`: The value to store
/// - `ttl`: Optional TTL amount; `<= 0` means the 60 second default
/// - `unit`: Unit of `ttl` (default: seconds)
#[derive(Debug, Clone, Deserialize)]
pub struct SetValueRequest {
    pub value: String,
    #[serde(default)]
    pub ttl: Option<i64>,
    #[serde(default)]
    pub unit: Option<TtlUnit>,
}

impl SetValueRequest {
    pub fn options(&self) -> SetOptions {
        match self.ttl {
            Some(ttl) => SetOptions::with_ttl_unit(ttl, self.unit.unwrap_or_default()),
            None => SetOptions::persistent(),
        }
    }
}

/// Request body for PUT /bits/:key/:index
#[derive(Debug, Clone, Deserialize)]
pub struct SetBitRequest {
    pub value: bool,
}

/// Optional body for POST /atomic/long/:key/increment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncrementRequest {
    #[serde(default)]
    pub init: Option<i64>,
}

/// Request body for POST /atomic/double/:key/add
#[derive(Debug, Clone, Deserialize)]
pub struct AddDoubleRequest {
    pub delta: f64,
    #[serde(default)]
    pub init: Option<f64>,
}

/// Request body carrying a single value (map fields, lists, queues)
#[derive(Debug, Clone, Deserialize)]
pub struct ValueRequest {
    pub value: String,
}

/// Request body for adding to a set or sorted set
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRequest {
    pub member: String,
}

/// Request body for POST /scored-set/:key
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredMemberRequest {
    pub member: String,
    pub score: f64,
}

/// Request body for POST /adder/:key/add
#[derive(Debug, Clone, Deserialize)]
pub struct DeltaRequest {
    pub delta: i64,
}
