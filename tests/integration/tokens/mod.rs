//! Token issuance and bearer authentication

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{expired_token, jwt_manager, TestApp, JWT_ISSUER};

#[tokio::test]
async fn test_issue_token_and_read_claims() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/tokens",
            json!({ "subject": "user-42", "claims": { "role": "admin", "sub": "ignored" } }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "body: {}", response.text);
    assert_eq!(response.json["token_type"], "Bearer");
    assert_eq!(response.json["expires_in"], 600);

    let token = response.json["token"].as_str().unwrap();
    let claims = jwt_manager().verify_jwt(token).unwrap();
    assert_eq!(claims.get_str("sub"), Some("user-42"));
    assert_eq!(claims.iss, JWT_ISSUER);
    assert_eq!(claims.exp - claims.iat, 600);

    let me = app.get("/me", Some(token)).await;
    assert_eq!(me.status, StatusCode::OK, "body: {}", me.text);
    assert_eq!(me.json["Payload"]["sub"], "user-42");
    assert_eq!(me.json["Payload"]["role"], "admin");
    assert_eq!(me.json["iss"], JWT_ISSUER);
}

#[tokio::test]
async fn test_me_requires_authorization() {
    let app = TestApp::new();
    let response = app.get("/me", None).await;
    response.assert_error(
        StatusCode::UNAUTHORIZED,
        Some(1002),
        "authorization header required",
    );
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let app = TestApp::new();
    let response = app.get("/me", Some("not.a.token")).await;
    response.assert_error(StatusCode::UNAUTHORIZED, Some(2004), "invalid token");
}

#[tokio::test]
async fn test_me_rejects_expired_token() {
    let app = TestApp::new();
    let response = app.get("/me", Some(&expired_token())).await;
    response.assert_error(
        StatusCode::UNAUTHORIZED,
        Some(2004),
        "invalid token: token has expired",
    );
}

#[tokio::test]
async fn test_issue_token_validation_errors() {
    let app = TestApp::new();

    let response = app.post_json("/tokens", json!({ "subject": "" })).await;
    response.assert_error(
        StatusCode::BAD_REQUEST,
        Some(1001),
        "subject: subject must be at least 1 characters",
    );

    let response = app.post_raw("/tokens", "").await;
    response.assert_error(
        StatusCode::BAD_REQUEST,
        Some(1001),
        "request body is required but was empty",
    );

    let response = app.post_raw("/tokens", "{not json").await;
    response.assert_error(StatusCode::BAD_REQUEST, Some(1001), "invalid request body");
}
