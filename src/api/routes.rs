//! API Routes
//!
//! Configures the Axum router with every gateway endpoint.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::*;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        // Demo
        .route("/redisson/test1", post(demo_detached_read))
        .route("/redisson/test2", post(demo_background_read))
        .route("/redisson/test3", post(demo_read_value))
        .route("/redisson/write-read", post(demo_write_then_read))
        // Bucket
        .route(
            "/bucket/:key",
            get(get_bucket).put(set_bucket).delete(delete_bucket),
        )
        .route("/bucket/:key/exists", get(bucket_exists))
        .route("/bucket/:key/ttl", get(bucket_ttl))
        // Bit set
        .route("/bits/:key/:index", get(get_bit).put(set_bit))
        // Atomic counters
        .route("/atomic/long/:key", get(get_long))
        .route("/atomic/long/:key/increment", post(increment_long))
        .route("/atomic/double/:key", get(get_double))
        .route("/atomic/double/:key/add", post(add_double))
        // Map
        .route("/map/:key", get(get_map))
        .route(
            "/map/:key/:field",
            get(get_map_field)
                .put(put_map_field)
                .delete(remove_map_field),
        )
        // Set
        .route("/set/:key", get(get_set).post(add_set))
        .route("/set/:key/:member", delete(remove_set))
        // Sorted set
        .route("/sorted-set/:key", get(get_sorted_set).post(add_sorted_set))
        .route("/sorted-set/:key/:member", delete(remove_sorted_set))
        // Scored sorted set
        .route("/scored-set/:key", get(get_scored_set).post(add_scored))
        .route("/scored-set/:key/:member", delete(remove_scored))
        .route("/scored-set/:key/:member/rank", get(scored_rank))
        .route("/scored-set/:key/:member/score", get(scored_score))
        // List
        .route(
            "/list/:key",
            get(get_list).post(add_list).delete(remove_list),
        )
        .route("/list/:key/:index", get(get_list_index))
        // Queue
        .route("/queue/:key", post(add_queue))
        .route("/queue/:key/peek", get(peek_queue))
        .route("/queue/:key/poll", post(poll_queue))
        // Long adder
        .route("/adder/:key", delete(adder_destroy))
        .route("/adder/:key/increment", post(adder_increment))
        .route("/adder/:key/decrement", post(adder_decrement))
        .route("/adder/:key/add", post(adder_add))
        .route("/adder/:key/sum", get(adder_sum))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
