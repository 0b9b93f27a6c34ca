//! Symmetric encryption endpoints

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use crate::common::{TestApp, ENCRYPT_SECRET};

#[tokio::test]
async fn test_encrypt_decrypt_round_trip() {
    let app = TestApp::new();

    let encrypted = app
        .post_json("/secrets/encrypt", json!({ "plaintext": "api-key-123" }))
        .await;
    assert_eq!(encrypted.status, StatusCode::OK, "body: {}", encrypted.text);
    let ciphertext = encrypted.json["ciphertext"].as_str().unwrap().to_string();

    // Output is compatible with the library helpers
    let raw = STANDARD.decode(&ciphertext).unwrap();
    assert_eq!(svckit_crypto::decrypt(&raw, ENCRYPT_SECRET).unwrap(), "api-key-123");

    let decrypted = app
        .post_json("/secrets/decrypt", json!({ "ciphertext": ciphertext }))
        .await;
    assert_eq!(decrypted.status, StatusCode::OK, "body: {}", decrypted.text);
    assert_eq!(decrypted.json["plaintext"], "api-key-123");
}

#[tokio::test]
async fn test_encrypt_is_randomized() {
    let app = TestApp::new();
    let first = app
        .post_json("/secrets/encrypt", json!({ "plaintext": "same" }))
        .await;
    let second = app
        .post_json("/secrets/encrypt", json!({ "plaintext": "same" }))
        .await;
    assert_ne!(first.json["ciphertext"], second.json["ciphertext"]);
}

#[tokio::test]
async fn test_encrypt_empty_plaintext() {
    let app = TestApp::new();
    let response = app
        .post_json("/secrets/encrypt", json!({ "plaintext": "" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json["ciphertext"].is_null());
}

#[tokio::test]
async fn test_decrypt_rejects_bad_input() {
    let app = TestApp::new();

    let response = app
        .post_json("/secrets/decrypt", json!({ "ciphertext": "%%%" }))
        .await;
    response.assert_error(
        StatusCode::BAD_REQUEST,
        Some(1001),
        "ciphertext must be valid base64",
    );

    let short = STANDARD.encode([1u8, 2, 3, 4]);
    let response = app
        .post_json("/secrets/decrypt", json!({ "ciphertext": short }))
        .await;
    response.assert_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(2001),
        "failed to decrypt data",
    );
}

#[tokio::test]
async fn test_decrypt_tampered_ciphertext() {
    let app = TestApp::new();
    let encrypted = app
        .post_json("/secrets/encrypt", json!({ "plaintext": "payload" }))
        .await;
    let mut raw = STANDARD
        .decode(encrypted.json["ciphertext"].as_str().unwrap())
        .unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x01;

    let response = app
        .post_json("/secrets/decrypt", json!({ "ciphertext": STANDARD.encode(raw) }))
        .await;
    response.assert_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(2001),
        "failed to decrypt data",
    );
}
