//! Event publishing onto the queue

use axum::http::StatusCode;
use serde_json::json;
use svckit_queue::MessageEnvelope;

use crate::common::{TestApp, QUEUE_URL};

#[tokio::test]
async fn test_publish_event_sends_envelope() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/events",
            json!({ "type": "user.created", "data": { "id": 7, "email": "a@example.com" } }),
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED, "body: {}", response.text);
    assert_eq!(response.json["message_id"], "mock-msg-1");

    let sent = app.queue.sent_bodies(QUEUE_URL);
    assert_eq!(sent.len(), 1);
    let envelope = MessageEnvelope::from_body(&sent[0]).unwrap();
    assert_eq!(envelope.kind, "user.created");
    let data: serde_json::Value = envelope.decode().unwrap();
    assert_eq!(data, json!({ "id": 7, "email": "a@example.com" }));
}

#[tokio::test]
async fn test_publish_event_send_failure() {
    let app = TestApp::new();
    app.queue.fail_sends(true);

    let response = app
        .post_json("/events", json!({ "type": "user.created", "data": {} }))
        .await;
    response.assert_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(1000),
        "internal server error",
    );
    assert!(!response.text.contains("injected"));
}

#[tokio::test]
async fn test_publish_event_without_queue() {
    let app = TestApp::without_queue();
    let response = app
        .post_json("/events", json!({ "type": "user.created", "data": {} }))
        .await;
    response.assert_error(
        StatusCode::SERVICE_UNAVAILABLE,
        Some(1000),
        "queue is not configured",
    );
}

#[tokio::test]
async fn test_publish_event_requires_type() {
    let app = TestApp::new();
    let response = app
        .post_json("/events", json!({ "type": "", "data": {} }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["code"], 1001);
    assert!(response.json["message"]
        .as_str()
        .unwrap()
        .ends_with("must be at least 1 characters"));
}
