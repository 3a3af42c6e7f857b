//! Request and Response models for the gateway API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    AddDoubleRequest, DeltaRequest, IncrementRequest, MemberRequest, ScoredMemberRequest,
    SetBitRequest, SetValueRequest, ValueRequest,
};
pub use responses::{
    BitResponse, ChangedResponse, CounterResponse, DeleteResponse, DoubleResponse,
    ErrorResponse, ExistsResponse, FieldResponse, HealthResponse, MapResponse, MembersResponse,
    RankResponse, ScoreResponse, ScoredMembersResponse, SetResponse, TtlResponse, ValueResponse,
};
