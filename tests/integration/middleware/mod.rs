//! Middleware stack as composed by the application router

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};

use crate::common::{TestApp, ALLOWED_ORIGIN};

#[tokio::test]
async fn test_health_has_hardening_headers() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "OK");
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert_eq!(response.headers["x-frame-options"], "DENY");
    assert_eq!(response.headers["referrer-policy"], "no-referrer");
    assert!(response.headers.get(header::SERVER).is_none());
    assert!(response
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_error_responses_keep_security_headers() {
    let app = TestApp::new();
    let response = app.get("/me", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        response.headers["strict-transport-security"],
        "max-age=63072000; includeSubDomains; preload"
    );
}

#[tokio::test]
async fn test_cors_for_allowed_origin() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        ALLOWED_ORIGIN
    );
    assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://other.example")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert!(response
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_preflight_returns_no_content() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/tokens")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.text.is_empty());
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, PATCH, DELETE, OPTIONS"
    );
}

#[tokio::test]
async fn test_database_health_without_pool() {
    let app = TestApp::new();
    let response = app.get("/health/db", None).await;
    response.assert_error(
        StatusCode::SERVICE_UNAVAILABLE,
        Some(3004),
        "database is not configured",
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/nope", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
}
