//! svckit application composition root
//!
//! Composes the shared crates into a single router, layered the way a
//! consuming service layers them: access log outermost, then security
//! headers, then the error responder closest to the handlers.

mod handlers;

use std::any::Any;
use std::sync::Arc;

use axum::extract::FromRef;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use svckit_auth::JwtManager;
use svckit_common::ApiError;
use svckit_crypto::CryptoConfig;
use svckit_http::{error_responder, request_logger, security_headers, SecurityHeadersConfig};
use svckit_queue::QueueClient;
use tower_http::catch_panic::CatchPanicLayer;

pub use handlers::{
    DecryptRequest, EncryptRequest, HashPasswordRequest, IssueTokenRequest, PublishEventRequest,
    VerifyPasswordRequest,
};

const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 3600;

/// Queue the service publishes events to
#[derive(Clone)]
pub struct QueueHandle {
    pub client: Arc<dyn QueueClient>,
    pub queue_url: String,
}

/// Shared state for every route
#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtManager>,
    pub token_expiry: chrono::Duration,
    pub crypto: Arc<CryptoConfig>,
    pub security: Arc<SecurityHeadersConfig>,
    pub pool: Option<PgPool>,
    pub queue: Option<QueueHandle>,
}

impl AppState {
    pub fn new(jwt: JwtManager, crypto: CryptoConfig) -> Self {
        Self {
            jwt: Arc::new(jwt),
            token_expiry: chrono::Duration::seconds(DEFAULT_TOKEN_EXPIRY_SECS),
            crypto: Arc::new(crypto),
            security: Arc::new(SecurityHeadersConfig::default()),
            pool: None,
            queue: None,
        }
    }

    pub fn with_token_expiry(mut self, expiry: chrono::Duration) -> Self {
        self.token_expiry = expiry;
        self
    }

    pub fn with_security(mut self, security: SecurityHeadersConfig) -> Self {
        self.security = Arc::new(security);
        self
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_queue(mut self, client: Arc<dyn QueueClient>, queue_url: impl Into<String>) -> Self {
        self.queue = Some(QueueHandle {
            client,
            queue_url: queue_url.into(),
        });
        self
    }
}

impl FromRef<AppState> for Arc<JwtManager> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.jwt)
    }
}

/// Render a handler panic as an uncoded error so the error responder logs
/// it and answers with the standard JSON body
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Unexpected(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}

/// Create the main application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let security = Arc::clone(&state.security);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/db", get(handlers::database_health))
        .route("/tokens", post(handlers::issue_token))
        .route("/me", get(handlers::me))
        .route("/secrets/encrypt", post(handlers::encrypt_secret))
        .route("/secrets/decrypt", post(handlers::decrypt_secret))
        .route("/passwords/hash", post(handlers::hash_password))
        .route("/passwords/verify", post(handlers::verify_password))
        .route("/events", post(handlers::publish_event))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(error_responder))
        .layer(from_fn_with_state(security, security_headers))
        .layer(from_fn(request_logger))
}
