use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use dishmap::routes::create_router;
use dishmap::services::sink::{EventSink, MemorySink};
use dishmap::state::AppState;

fn create_test_server() -> (TestServer, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new(100));
    let state = AppState::new(sink.clone());
    let app = create_router(state);
    (TestServer::new(app).unwrap(), sink)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _sink) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_track_event_is_recorded() {
    let (server, sink) = create_test_server();

    let response = server
        .post("/api/event/track")
        .json(&json!({
            "type": "marker_click",
            "placeId": "p1",
            "sessionId": "s-123"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    let events = sink.recent(10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind.as_str(), "marker_click");
    assert_eq!(events[0].place_id.as_deref(), Some("p1"));
    assert_eq!(events[0].session_id, "s-123");
}

#[tokio::test]
async fn test_track_rejects_missing_session_id() {
    let (server, sink) = create_test_server();

    let response = server
        .post("/api/event/track")
        .json(&json!({
            "type": "page_view"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());

    assert!(sink.recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_track_rejects_empty_session_id() {
    let (server, _sink) = create_test_server();

    let response = server
        .post("/api/event/track")
        .json(&json!({
            "type": "page_view",
            "sessionId": ""
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_track_rejects_missing_type() {
    let (server, _sink) = create_test_server();

    let response = server
        .post("/api/event/track")
        .json(&json!({
            "sessionId": "s-123"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_track_rejects_unknown_event_kind() {
    let (server, _sink) = create_test_server();

    // An unknown kind fails deserialization of the whole body
    let response = server
        .post("/api/event/track")
        .json(&json!({
            "type": "mystery_event",
            "sessionId": "s-123"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_track_stores_metadata_string() {
    let (server, sink) = create_test_server();

    let response = server
        .post("/api/event/track")
        .json(&json!({
            "type": "page_view",
            "sessionId": "s-123",
            "metadata": "{\"url\":\"/influencer/asha-eats\"}"
        }))
        .await;

    response.assert_status_ok();

    let events = sink.recent(10).await.unwrap();
    let metadata: serde_json::Value =
        serde_json::from_str(events[0].metadata.as_deref().unwrap()).unwrap();
    assert_eq!(metadata["url"], "/influencer/asha-eats");
}

#[tokio::test]
async fn test_recent_returns_newest_first_and_respects_limit() {
    let (server, _sink) = create_test_server();

    for place in ["p1", "p2", "p3"] {
        server
            .post("/api/event/track")
            .json(&json!({
                "type": "marker_click",
                "placeId": place,
                "sessionId": "s-123"
            }))
            .await
            .assert_status_ok();
    }

    let response = server.get("/api/event/recent?limit=2").await;
    response.assert_status_ok();

    let events: Vec<serde_json::Value> = response.json();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["placeId"], "p3");
    assert_eq!(events[1]["placeId"], "p2");
}

#[tokio::test]
async fn test_recent_defaults_to_ten_events() {
    let (server, _sink) = create_test_server();

    for i in 0..15 {
        server
            .post("/api/event/track")
            .json(&json!({
                "type": "marker_click",
                "placeId": format!("p{i}"),
                "sessionId": "s-123"
            }))
            .await
            .assert_status_ok();
    }

    let response = server.get("/api/event/recent").await;
    response.assert_status_ok();

    let events: Vec<serde_json::Value> = response.json();
    assert_eq!(events.len(), 10);
    assert_eq!(events[0]["placeId"], "p14");
}

#[tokio::test]
async fn test_responses_carry_a_request_id() {
    let (server, _sink) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let request_id = response.header("x-request-id");
    assert!(!request_id.is_empty());
}
