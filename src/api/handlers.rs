//! API Handlers
//!
//! HTTP request handlers. Each one extracts its parameters, makes one façade
//! or demo-service call and wraps the result in a response DTO.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::error::{FacadeError, Result};
use crate::facade::ObjectFacade;
use crate::models::{
    AddDoubleRequest, BitResponse, ChangedResponse, CounterResponse, DeleteResponse,
    DeltaRequest, DoubleResponse, ExistsResponse, FieldResponse, HealthResponse,
    IncrementRequest, MapResponse, MemberRequest, MembersResponse, RankResponse,
    ScoreResponse, ScoredMemberRequest, ScoredMembersResponse, SetBitRequest, SetResponse,
    SetValueRequest, TtlResponse, ValueRequest, ValueResponse,
};
use crate::service::DemoService;
use crate::store::ObjectStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub facade: ObjectFacade,
    pub service: DemoService,
}

impl AppState {
    /// Builds the façade and demo service over the shared store handle.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        let facade = ObjectFacade::new(store);
        let service = DemoService::new(facade.clone());
        Self { facade, service }
    }
}

/// Reads the `key` request header used by the demo endpoints.
fn header_key(headers: &HeaderMap) -> Result<String> {
    headers
        .get("key")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| FacadeError::InvalidRequest("missing header 'key'".to_string()))
}

/// Parses an optional JSON body; an empty body yields the defaults.
fn optional_body<T>(body: &[u8]) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|error| FacadeError::InvalidRequest(format!("invalid request body: {}", error)))
}

// == Health ==
/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let store = state.facade.store();
    store.ping().await?;
    Ok(Json(HealthResponse::healthy(store.name())))
}

// == Demo ==
/// Handler for POST /redisson/test1
pub async fn demo_detached_read(State(state): State<AppState>) -> Result<String> {
    state.service.read_detached().await
}

/// Handler for POST /redisson/test2
pub async fn demo_background_read(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<String> {
    let key = header_key(&headers)?;
    Ok(state.service.read_in_background(&key).to_string())
}

/// Handler for POST /redisson/test3
pub async fn demo_read_value(State(state): State<AppState>, headers: HeaderMap) -> Result<String> {
    let key = header_key(&headers)?;
    state.service.read_value(&key).await
}

/// Handler for POST /redisson/write-read
pub async fn demo_write_then_read(State(state): State<AppState>) -> Result<String> {
    state.service.write_then_read().await
}

// == Bucket ==
pub async fn get_bucket(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ValueResponse>> {
    let value = state.facade.get(&key).await?;
    Ok(Json(ValueResponse::new(key, value)))
}

pub async fn set_bucket(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetValueRequest>,
) -> Result<Json<SetResponse>> {
    state.facade.set(&key, &req.value, req.options()).await?;
    Ok(Json(SetResponse::new(key)))
}

pub async fn delete_bucket(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.facade.delete(&key).await?;
    Ok(Json(DeleteResponse::new(key, deleted)))
}

pub async fn bucket_exists(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExistsResponse>> {
    let exists = state.facade.exists(&key).await?;
    Ok(Json(ExistsResponse::new(key, exists)))
}

pub async fn bucket_ttl(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TtlResponse>> {
    let ttl = state.facade.remaining_ttl_ms(&key).await?;
    Ok(Json(TtlResponse::new(key, ttl)))
}

// == Bit Set ==
pub async fn get_bit(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, u64)>,
) -> Result<Json<BitResponse>> {
    let value = state.facade.get_bit(&key, index).await?;
    Ok(Json(BitResponse::new(key, index, value)))
}

/// Responds with the bit's previous value.
pub async fn set_bit(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, u64)>,
    Json(req): Json<SetBitRequest>,
) -> Result<Json<BitResponse>> {
    let previous = state.facade.set_bit(&key, index, req.value).await?;
    Ok(Json(BitResponse::new(key, index, previous)))
}

// == Atomic Counters ==
pub async fn get_long(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CounterResponse>> {
    let value = state.facade.get_long(&key).await?;
    Ok(Json(CounterResponse::new(key, value)))
}

/// The body is optional; without one the counter is simply incremented.
/// A body that is present but malformed is rejected.
pub async fn increment_long(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<CounterResponse>> {
    let req: IncrementRequest = optional_body(&body)?;
    let value = state.facade.increment_and_get(&key, req.init).await?;
    Ok(Json(CounterResponse::new(key, value)))
}

pub async fn get_double(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DoubleResponse>> {
    let value = state.facade.get_double(&key).await?;
    Ok(Json(DoubleResponse::new(key, value)))
}

pub async fn add_double(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<AddDoubleRequest>,
) -> Result<Json<DoubleResponse>> {
    let value = state
        .facade
        .add_and_get_double(&key, req.delta, req.init)
        .await?;
    Ok(Json(DoubleResponse::new(key, value)))
}

// == Map ==
pub async fn get_map(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MapResponse>> {
    let entries = state.facade.get_map(&key).await?;
    Ok(Json(MapResponse::new(key, entries)))
}

pub async fn get_map_field(
    State(state): State<AppState>,
    Path((key, field)): Path<(String, String)>,
) -> Result<Json<FieldResponse>> {
    let value = state.facade.get_map_field(&key, &field).await?;
    Ok(Json(FieldResponse::new(key, field, value)))
}

/// Responds with the field's previous value.
pub async fn put_map_field(
    State(state): State<AppState>,
    Path((key, field)): Path<(String, String)>,
    Json(req): Json<ValueRequest>,
) -> Result<Json<FieldResponse>> {
    let previous = state.facade.put_map_field(&key, &field, &req.value).await?;
    Ok(Json(FieldResponse::new(key, field, previous)))
}

/// Responds with the removed value, `null` if the field was absent.
pub async fn remove_map_field(
    State(state): State<AppState>,
    Path((key, field)): Path<(String, String)>,
) -> Result<Json<FieldResponse>> {
    let removed = state.facade.remove_map_field(&key, &field).await?;
    Ok(Json(FieldResponse::new(key, field, removed)))
}

// == Set ==
pub async fn get_set(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MembersResponse>> {
    let mut members: Vec<String> = state.facade.get_set(&key).await?.into_iter().collect();
    members.sort();
    Ok(Json(MembersResponse::new(key, members)))
}

pub async fn add_set(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<ChangedResponse>> {
    let added = state.facade.add_set(&key, &req.member).await?;
    Ok(Json(ChangedResponse::new(key, added)))
}

pub async fn remove_set(
    State(state): State<AppState>,
    Path((key, member)): Path<(String, String)>,
) -> Result<Json<ChangedResponse>> {
    let removed = state.facade.remove_set(&key, &member).await?;
    Ok(Json(ChangedResponse::new(key, removed)))
}

// == Sorted Set ==
pub async fn get_sorted_set(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MembersResponse>> {
    let members = state.facade.get_sorted_set(&key).await?;
    Ok(Json(MembersResponse::new(key, members)))
}

pub async fn add_sorted_set(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<ChangedResponse>> {
    let added = state.facade.add_sorted_set(&key, &req.member).await?;
    Ok(Json(ChangedResponse::new(key, added)))
}

pub async fn remove_sorted_set(
    State(state): State<AppState>,
    Path((key, member)): Path<(String, String)>,
) -> Result<Json<ChangedResponse>> {
    let removed = state.facade.remove_sorted_set(&key, &member).await?;
    Ok(Json(ChangedResponse::new(key, removed)))
}

// == Scored Sorted Set ==
pub async fn get_scored_set(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ScoredMembersResponse>> {
    let members = state.facade.get_scored_sorted_set(&key).await?;
    Ok(Json(ScoredMembersResponse::new(key, members)))
}

pub async fn add_scored(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ScoredMemberRequest>,
) -> Result<Json<ChangedResponse>> {
    let added = state.facade.add_scored(&key, &req.member, req.score).await?;
    Ok(Json(ChangedResponse::new(key, added)))
}

pub async fn remove_scored(
    State(state): State<AppState>,
    Path((key, member)): Path<(String, String)>,
) -> Result<Json<ChangedResponse>> {
    let removed = state.facade.remove_scored(&key, &member).await?;
    Ok(Json(ChangedResponse::new(key, removed)))
}

pub async fn scored_rank(
    State(state): State<AppState>,
    Path((key, member)): Path<(String, String)>,
) -> Result<Json<RankResponse>> {
    let rank = state.facade.rank(&key, &member).await?;
    Ok(Json(RankResponse { key, member, rank }))
}

pub async fn scored_score(
    State(state): State<AppState>,
    Path((key, member)): Path<(String, String)>,
) -> Result<Json<ScoreResponse>> {
    let score = state.facade.score(&key, &member).await?;
    Ok(Json(ScoreResponse { key, member, score }))
}

// == List ==
pub async fn get_list(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MembersResponse>> {
    let items = state.facade.get_list(&key).await?;
    Ok(Json(MembersResponse::new(key, items)))
}

pub async fn add_list(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ValueRequest>,
) -> Result<Json<ChangedResponse>> {
    let added = state.facade.add_list(&key, &req.value).await?;
    Ok(Json(ChangedResponse::new(key, added)))
}

pub async fn remove_list(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ValueRequest>,
) -> Result<Json<ChangedResponse>> {
    let removed = state.facade.remove_list(&key, &req.value).await?;
    Ok(Json(ChangedResponse::new(key, removed)))
}

pub async fn get_list_index(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, i64)>,
) -> Result<Json<ValueResponse>> {
    let value = state.facade.get_list_index(&key, index).await?;
    Ok(Json(ValueResponse::new(key, value)))
}

// == Queue ==
pub async fn add_queue(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ValueRequest>,
) -> Result<Json<ChangedResponse>> {
    let added = state.facade.add_queue(&key, &req.value).await?;
    Ok(Json(ChangedResponse::new(key, added)))
}

pub async fn peek_queue(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ValueResponse>> {
    let head = state.facade.peek_queue(&key).await?;
    Ok(Json(ValueResponse::new(key, head)))
}

pub async fn poll_queue(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ValueResponse>> {
    let head = state.facade.poll_queue(&key).await?;
    Ok(Json(ValueResponse::new(key, head)))
}

// == Long Adder ==
pub async fn adder_increment(State(state): State<AppState>, Path(key): Path<String>) -> StatusCode {
    state.facade.adder_increment(&key).await;
    StatusCode::NO_CONTENT
}

pub async fn adder_decrement(State(state): State<AppState>, Path(key): Path<String>) -> StatusCode {
    state.facade.adder_decrement(&key).await;
    StatusCode::NO_CONTENT
}

pub async fn adder_add(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<DeltaRequest>,
) -> StatusCode {
    state.facade.adder_add(&key, req.delta).await;
    StatusCode::NO_CONTENT
}

pub async fn adder_sum(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CounterResponse>> {
    let total = state.facade.adder_sum(&key).await?;
    Ok(Json(CounterResponse::new(key, total)))
}

pub async fn adder_destroy(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    state.facade.adder_destroy(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
