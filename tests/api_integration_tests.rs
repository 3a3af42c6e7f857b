//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles against the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use redis_objects::{api::create_router, store::MemoryStore, AppState};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(Arc::new(MemoryStore::new())))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, json: Option<&str>) -> (StatusCode, Body) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match json {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    (response.status(), response.into_body())
}

// == Bucket Tests ==

#[tokio::test]
async fn test_bucket_set_get_delete_cycle() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "PUT",
        "/bucket/get_key",
        Some(r#"{"value":"get_value"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json = body_to_json(body).await;
    assert!(json["message"].as_str().unwrap().contains("get_key"));

    let (status, body) = send(&app, "GET", "/bucket/get_key", None).await;
    assert_eq!(status, StatusCode::OK);
    let json = body_to_json(body).await;
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");

    let (_, body) = send(&app, "DELETE", "/bucket/get_key", None).await;
    assert_eq!(body_to_json(body).await["deleted"], true);

    let (_, body) = send(&app, "GET", "/bucket/get_key/exists", None).await;
    assert_eq!(body_to_json(body).await["exists"], false);

    let (status, body) = send(&app, "GET", "/bucket/get_key", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body_to_json(body).await["value"].is_null());
}

#[tokio::test]
async fn test_bucket_zero_ttl_gets_default() {
    let app = create_test_app();

    let (status, _) = send(&app, "PUT", "/bucket/ttl_key", Some(r#"{"value":"v","ttl":0}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/bucket/ttl_key/ttl", None).await;
    let ttl = body_to_json(body).await["ttl_ms"].as_u64().unwrap();
    assert!(ttl > 55_000 && ttl <= 60_000);
}

#[tokio::test]
async fn test_bucket_ttl_with_unit() {
    let app = create_test_app();

    send(
        &app,
        "PUT",
        "/bucket/ttl_key",
        Some(r#"{"value":"v","ttl":2,"unit":"minutes"}"#),
    )
    .await;

    let (_, body) = send(&app, "GET", "/bucket/ttl_key/ttl", None).await;
    let ttl = body_to_json(body).await["ttl_ms"].as_u64().unwrap();
    assert!(ttl > 115_000 && ttl <= 120_000);
}

#[tokio::test]
async fn test_bucket_huge_ttl_is_stored() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/bucket/big",
        Some(r#"{"value":"v","ttl":18446744073709551}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/bucket/big", None).await;
    assert_eq!(body_to_json(body).await["value"], "v");

    let (_, body) = send(&app, "GET", "/bucket/big/ttl", None).await;
    assert!(body_to_json(body).await["ttl_ms"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let (status, _) = send(&app, "PUT", "/bucket/k", Some(r#"{"invalid json"#)).await;
    assert!(status.is_client_error());
}

// == Demo Tests ==

#[tokio::test]
async fn test_demo_endpoints() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/redisson/write-read", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body_to_string(body).await, "a3");

    send(&app, "PUT", "/bucket/name4", Some(r#"{"value":"a4"}"#)).await;
    let (status, body) = send(&app, "POST", "/redisson/test1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body_to_string(body).await, "a4");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/redisson/test2")
                .header("key", "name4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_string(response.into_body()).await, "1122");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/redisson/test3")
                .header("key", "name3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_string(response.into_body()).await, "a3");
}

// == Counter Tests ==

#[tokio::test]
async fn test_atomic_long_increment() {
    let app = create_test_app();

    let (_, body) = send(&app, "POST", "/atomic/long/c/increment", None).await;
    assert_eq!(body_to_json(body).await["value"], 1);

    let (_, body) = send(&app, "POST", "/atomic/long/c/increment", Some(r#"{"init":5}"#)).await;
    assert_eq!(body_to_json(body).await["value"], 6);

    let (_, body) = send(&app, "GET", "/atomic/long/c", None).await;
    assert_eq!(body_to_json(body).await["value"], 6);
}

#[tokio::test]
async fn test_atomic_long_malformed_init_is_bad_request() {
    let app = create_test_app();

    for expected in [1, 2] {
        let (status, body) = send(&app, "POST", "/atomic/long/c/increment", Some("{}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_to_json(body).await["value"], expected);
    }

    let (status, body) = send(
        &app,
        "POST",
        "/atomic/long/c/increment",
        Some(r#"{"init":"five"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body_to_json(body).await.get("error").is_some());

    let (_, body) = send(&app, "GET", "/atomic/long/c", None).await;
    assert_eq!(body_to_json(body).await["value"], 2);
}

#[tokio::test]
async fn test_atomic_double_add() {
    let app = create_test_app();

    let (_, body) = send(
        &app,
        "POST",
        "/atomic/double/d/add",
        Some(r#"{"delta":0.5,"init":2.0}"#),
    )
    .await;
    assert_eq!(body_to_json(body).await["value"], 2.5);

    let (_, body) = send(&app, "GET", "/atomic/double/d", None).await;
    assert_eq!(body_to_json(body).await["value"], 2.5);
}

#[tokio::test]
async fn test_counter_on_text_value_is_conflict() {
    let app = create_test_app();

    send(&app, "PUT", "/bucket/text", Some(r#"{"value":"abc"}"#)).await;
    let (status, body) = send(&app, "POST", "/atomic/long/text/increment", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body_to_json(body).await.get("error").is_some());
}

// == Bit Set Tests ==

#[tokio::test]
async fn test_bits() {
    let app = create_test_app();

    let (_, body) = send(&app, "PUT", "/bits/flags/5", Some(r#"{"value":true}"#)).await;
    assert_eq!(body_to_json(body).await["value"], false);

    let (_, body) = send(&app, "GET", "/bits/flags/5", None).await;
    assert_eq!(body_to_json(body).await["value"], true);
}

// == Map Tests ==

#[tokio::test]
async fn test_map_fields() {
    let app = create_test_app();

    let (_, body) = send(&app, "PUT", "/map/user/name", Some(r#"{"value":"ada"}"#)).await;
    assert!(body_to_json(body).await["value"].is_null());

    let (_, body) = send(&app, "PUT", "/map/user/name", Some(r#"{"value":"grace"}"#)).await;
    assert_eq!(body_to_json(body).await["value"], "ada");

    let (_, body) = send(&app, "GET", "/map/user", None).await;
    assert_eq!(body_to_json(body).await["entries"]["name"], "grace");

    let (_, body) = send(&app, "DELETE", "/map/user/name", None).await;
    assert_eq!(body_to_json(body).await["value"], "grace");

    let (_, body) = send(&app, "GET", "/map/user/name", None).await;
    assert!(body_to_json(body).await["value"].is_null());
}

// == Set Tests ==

#[tokio::test]
async fn test_sets() {
    let app = create_test_app();

    let (_, body) = send(&app, "POST", "/set/tags", Some(r#"{"member":"b"}"#)).await;
    assert_eq!(body_to_json(body).await["changed"], true);
    send(&app, "POST", "/set/tags", Some(r#"{"member":"a"}"#)).await;
    let (_, body) = send(&app, "POST", "/set/tags", Some(r#"{"member":"a"}"#)).await;
    assert_eq!(body_to_json(body).await["changed"], false);

    let (_, body) = send(&app, "GET", "/set/tags", None).await;
    assert_eq!(body_to_json(body).await["members"], serde_json::json!(["a", "b"]));

    let (_, body) = send(&app, "DELETE", "/set/tags/a", None).await;
    assert_eq!(body_to_json(body).await["changed"], true);
}

#[tokio::test]
async fn test_sorted_set_keeps_natural_order() {
    let app = create_test_app();

    for member in ["pear", "apple", "fig"] {
        let json = format!(r#"{{"member":"{}"}}"#, member);
        send(&app, "POST", "/sorted-set/fruit", Some(&json)).await;
    }

    let (_, body) = send(&app, "GET", "/sorted-set/fruit", None).await;
    assert_eq!(
        body_to_json(body).await["members"],
        serde_json::json!(["apple", "fig", "pear"])
    );

    let (_, body) = send(&app, "DELETE", "/sorted-set/fruit/fig", None).await;
    assert_eq!(body_to_json(body).await["changed"], true);
}

#[tokio::test]
async fn test_scored_set_rank_and_score() {
    let app = create_test_app();

    send(&app, "POST", "/scored-set/board", Some(r#"{"member":"m","score":3.0}"#)).await;

    let (_, body) = send(&app, "GET", "/scored-set/board/m/score", None).await;
    assert_eq!(body_to_json(body).await["score"], 3.0);

    let (_, body) = send(&app, "GET", "/scored-set/board/m/rank", None).await;
    assert_eq!(body_to_json(body).await["rank"], 0);

    send(&app, "POST", "/scored-set/board", Some(r#"{"member":"low","score":1.0}"#)).await;
    let (_, body) = send(&app, "GET", "/scored-set/board/m/rank", None).await;
    assert_eq!(body_to_json(body).await["rank"], 1);

    let (_, body) = send(&app, "GET", "/scored-set/board", None).await;
    let json = body_to_json(body).await;
    assert_eq!(json["members"][0]["member"], "low");

    let (_, body) = send(&app, "GET", "/scored-set/board/ghost/rank", None).await;
    assert!(body_to_json(body).await["rank"].is_null());
}

// == List and Queue Tests ==

#[tokio::test]
async fn test_list() {
    let app = create_test_app();

    send(&app, "POST", "/list/l", Some(r#"{"value":"a"}"#)).await;
    send(&app, "POST", "/list/l", Some(r#"{"value":"b"}"#)).await;

    let (_, body) = send(&app, "GET", "/list/l/1", None).await;
    assert_eq!(body_to_json(body).await["value"], "b");

    let (_, body) = send(&app, "GET", "/list/l/-1", None).await;
    assert_eq!(body_to_json(body).await["value"], "b");

    let (_, body) = send(&app, "DELETE", "/list/l", Some(r#"{"value":"a"}"#)).await;
    assert_eq!(body_to_json(body).await["changed"], true);

    let (_, body) = send(&app, "GET", "/list/l", None).await;
    assert_eq!(body_to_json(body).await["members"], serde_json::json!(["b"]));
}

#[tokio::test]
async fn test_queue_peek_and_poll() {
    let app = create_test_app();

    send(&app, "POST", "/queue/jobs", Some(r#"{"value":"x"}"#)).await;

    for _ in 0..2 {
        let (_, body) = send(&app, "GET", "/queue/jobs/peek", None).await;
        assert_eq!(body_to_json(body).await["value"], "x");
    }

    let (_, body) = send(&app, "POST", "/queue/jobs/poll", None).await;
    assert_eq!(body_to_json(body).await["value"], "x");

    let (_, body) = send(&app, "GET", "/queue/jobs/peek", None).await;
    assert!(body_to_json(body).await["value"].is_null());
}

// == Adder Tests ==

#[tokio::test]
async fn test_adder_lifecycle() {
    let app = create_test_app();

    let (status, _) = send(&app, "POST", "/adder/hits/increment", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    send(&app, "POST", "/adder/hits/increment", None).await;
    send(&app, "POST", "/adder/hits/decrement", None).await;
    send(&app, "POST", "/adder/hits/add", Some(r#"{"delta":41}"#)).await;

    let (_, body) = send(&app, "GET", "/adder/hits/sum", None).await;
    assert_eq!(body_to_json(body).await["value"], 42);

    let (status, _) = send(&app, "DELETE", "/adder/hits", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", "/adder/hits/sum", None).await;
    assert_eq!(body_to_json(body).await["value"], 0);
}

// == Health Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let json = body_to_json(body).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["backend"], "memory");
    assert!(json.get("timestamp").is_some());
}
