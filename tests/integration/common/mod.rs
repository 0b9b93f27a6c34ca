//! Common test utilities and fixtures for integration tests
//!
//! Builds the full application router around in-memory collaborators:
//! - HMAC token manager with a fixed test secret
//! - Crypto configuration with low bcrypt cost
//! - Mock queue client standing in for SQS

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use svckit_app::{create_app, AppState};
use svckit_auth::{Algorithm, JwtManager, Payload};
use svckit_crypto::CryptoConfig;
use svckit_http::SecurityHeadersConfig;
use svckit_queue::mock::MockQueueClient;
use tower::ServiceExt;

pub const JWT_SECRET: &[u8] = b"integration-test-secret-key";
pub const JWT_ISSUER: &str = "svckit-test";
pub const ENCRYPT_SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const QUEUE_URL: &str = "mock://events";
pub const ALLOWED_ORIGIN: &str = "https://app.example";

pub fn jwt_manager() -> JwtManager {
    JwtManager::hmac(Algorithm::HS256, JWT_SECRET, JWT_ISSUER).unwrap()
}

pub fn crypto_config() -> CryptoConfig {
    CryptoConfig {
        encrypt_secret: Some(ENCRYPT_SECRET.to_string()),
        bcrypt_cost: 4,
        hash_secret: Some("integration-hash-secret".to_string()),
    }
}

/// Response with the body parsed as JSON when possible
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
    pub json: Value,
}

impl TestResponse {
    /// Assert the standard error body and return it
    pub fn assert_error(&self, status: StatusCode, code: Option<i64>, message: &str) {
        assert_eq!(self.status, status, "body: {}", self.text);
        assert_eq!(self.json["success"], false);
        assert_eq!(self.json["message"], message);
        match code {
            Some(code) => assert_eq!(self.json["code"], code),
            None => assert!(self.json.get("code").is_none()),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub queue: MockQueueClient,
}

impl TestApp {
    /// App with a mock queue and one allowed CORS origin
    pub fn new() -> Self {
        let queue = MockQueueClient::new();
        let state = Self::base_state().with_queue(Arc::new(queue.clone()), QUEUE_URL);
        Self {
            router: create_app(state),
            queue,
        }
    }

    /// App with no queue configured
    pub fn without_queue() -> Self {
        Self {
            router: create_app(Self::base_state()),
            queue: MockQueueClient::new(),
        }
    }

    fn base_state() -> AppState {
        AppState::new(jwt_manager(), crypto_config())
            .with_token_expiry(chrono::Duration::minutes(10))
            .with_security(SecurityHeadersConfig::with_origins(vec![
                ALLOWED_ORIGIN.to_string()
            ]))
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            text,
            json,
        }
    }

    pub async fn get(&self, path: &str, bearer: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.post_raw(path, &body.to_string()).await
    }

    /// Issue a token through the API and return it
    pub async fn issue_token(&self, subject: &str) -> String {
        let response = self
            .post_json("/tokens", serde_json::json!({ "subject": subject }))
            .await;
        assert_eq!(response.status, StatusCode::OK, "body: {}", response.text);
        response.json["token"].as_str().unwrap().to_string()
    }
}

/// Token signed with the test secret but already expired
pub fn expired_token() -> String {
    jwt_manager()
        .generate_jwt(Payload::new(), chrono::Duration::seconds(-120))
        .unwrap()
}
