//! Publish-then-consume flow
//!
//! Events posted over HTTP land on the mock queue and are consumed by the
//! receive loop through an envelope router, then acknowledged.

#![allow(dead_code)]

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use svckit_queue::{
    receive_messages, EnvelopeHandler, EnvelopeRouter, HandlerError, MessageEnvelope,
    ReceiveConfig,
};
use tokio_util::sync::CancellationToken;

use common::{TestApp, QUEUE_URL};

#[derive(Debug, Deserialize, PartialEq)]
struct UserCreated {
    id: u64,
    email: String,
}

#[derive(Clone, Default)]
struct UserCreatedHandler {
    seen: Arc<Mutex<Vec<UserCreated>>>,
}

#[async_trait::async_trait]
impl EnvelopeHandler for UserCreatedHandler {
    async fn handle(&self, envelope: &MessageEnvelope) -> Result<(), HandlerError> {
        let event: UserCreated = envelope.decode()?;
        if event.email.is_empty() {
            return Err("email missing".into());
        }
        self.seen.lock().unwrap().push(event);
        Ok(())
    }
}

fn fast_config() -> ReceiveConfig {
    ReceiveConfig {
        wait_time_seconds: 1,
        poll_interval: Duration::from_millis(20),
        ..ReceiveConfig::default()
    }
}

async fn wait_for(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_published_events_are_consumed_and_deleted() {
    let app = TestApp::new();
    let handler = UserCreatedHandler::default();
    let router = EnvelopeRouter::new().route("user.created", handler.clone());

    let shutdown = CancellationToken::new();
    let consumer = tokio::spawn(receive_messages(
        Arc::new(app.queue.clone()),
        QUEUE_URL.to_string(),
        fast_config(),
        Arc::new(router),
        shutdown.clone(),
    ));

    for (id, email) in [(1, "a@example.com"), (2, "b@example.com")] {
        let response = app
            .post_json(
                "/events",
                json!({ "type": "user.created", "data": { "id": id, "email": email } }),
            )
            .await;
        assert_eq!(response.status, axum::http::StatusCode::ACCEPTED);
    }

    let queue = app.queue.clone();
    wait_for(move || queue.deleted_bodies(QUEUE_URL).len() == 2).await;

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), consumer)
        .await
        .unwrap()
        .unwrap();

    let mut seen = handler.seen.lock().unwrap().iter().map(|e| e.id).collect::<Vec<_>>();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2]);
    assert_eq!(app.queue.available_count(QUEUE_URL), 0);
    assert!(app.queue.in_flight_bodies(QUEUE_URL).is_empty());
}

#[tokio::test]
async fn test_unhandled_events_stay_on_queue() {
    let app = TestApp::new();
    let handler = UserCreatedHandler::default();
    let router = EnvelopeRouter::new().route("user.created", handler.clone());

    let shutdown = CancellationToken::new();
    let consumer = tokio::spawn(receive_messages(
        Arc::new(app.queue.clone()),
        QUEUE_URL.to_string(),
        fast_config(),
        Arc::new(router),
        shutdown.clone(),
    ));

    // Unknown type, and a known type the handler rejects
    app.post_json("/events", json!({ "type": "order.placed", "data": { "id": 9 } }))
        .await;
    app.post_json(
        "/events",
        json!({ "type": "user.created", "data": { "id": 3, "email": "" } }),
    )
    .await;
    app.post_json(
        "/events",
        json!({ "type": "user.created", "data": { "id": 4, "email": "d@example.com" } }),
    )
    .await;

    let queue = app.queue.clone();
    wait_for(move || {
        queue.deleted_bodies(QUEUE_URL).len() == 1 && queue.in_flight_bodies(QUEUE_URL).len() == 2
    })
    .await;

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), consumer)
        .await
        .unwrap()
        .unwrap();

    let in_flight = app.queue.in_flight_bodies(QUEUE_URL);
    assert!(in_flight.iter().any(|body| body.contains("order.placed")));
    assert!(in_flight.iter().any(|body| body.contains("\"id\":3")));
    assert_eq!(
        *handler.seen.lock().unwrap(),
        vec![UserCreated {
            id: 4,
            email: "d@example.com".to_string()
        }]
    );
}
