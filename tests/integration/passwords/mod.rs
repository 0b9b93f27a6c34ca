//! Password hashing endpoints

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_hash_then_verify() {
    let app = TestApp::new();

    let hashed = app
        .post_json("/passwords/hash", json!({ "password": "correct horse" }))
        .await;
    assert_eq!(hashed.status, StatusCode::OK, "body: {}", hashed.text);
    let hash = hashed.json["hash"].as_str().unwrap().to_string();
    assert!(hash.starts_with("$2"));
    assert_ne!(hash, "correct horse");

    let verified = app
        .post_json(
            "/passwords/verify",
            json!({ "password": "correct horse", "hash": hash }),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK, "body: {}", verified.text);
    assert_eq!(verified.json["valid"], true);

    let wrong = app
        .post_json(
            "/passwords/verify",
            json!({ "password": "battery staple", "hash": hash }),
        )
        .await;
    wrong.assert_error(StatusCode::UNAUTHORIZED, Some(4000), "invalid credentials");
}

#[tokio::test]
async fn test_verify_malformed_hash_is_mismatch() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/passwords/verify",
            json!({ "password": "whatever1", "hash": "not-a-bcrypt-hash" }),
        )
        .await;
    response.assert_error(StatusCode::UNAUTHORIZED, Some(4000), "invalid credentials");
}

#[tokio::test]
async fn test_hash_rejects_short_password() {
    let app = TestApp::new();
    let response = app
        .post_json("/passwords/hash", json!({ "password": "short" }))
        .await;
    response.assert_error(
        StatusCode::BAD_REQUEST,
        Some(1001),
        "password: password must be at least 8 characters",
    );
}
