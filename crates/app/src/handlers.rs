//! Route handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{json, Value};
use svckit_auth::{BearerClaims, Claims, Payload};
use svckit_common::{ApiError, CodedError, ErrorCode, ErrorParams, ValidatedJson};
use svckit_crypto::compare_password;
use svckit_queue::{send_envelope, MessageEnvelope};
use validator::Validate;

use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct IssueTokenRequest {
    #[validate(length(min = 1, max = 128))]
    pub subject: String,
    /// Extra payload entries; `sub` is always overwritten by `subject`
    #[serde(default)]
    pub claims: Payload,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EncryptRequest {
    pub plaintext: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DecryptRequest {
    /// Base64 of `nonce || ciphertext || tag`
    #[validate(length(min = 1))]
    pub ciphertext: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct HashPasswordRequest {
    #[validate(length(min = 8, max = 72))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyPasswordRequest {
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub hash: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PublishEventRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64))]
    pub kind: String,
    pub data: Box<RawValue>,
}

fn bad_input(message: &str) -> CodedError {
    CodedError::new(
        ErrorParams::new()
            .with_http_code(StatusCode::BAD_REQUEST)
            .with_code(ErrorCode::InvalidRequest)
            .with_message(message),
    )
}

fn not_configured(code: ErrorCode, message: &str) -> CodedError {
    CodedError::new(
        ErrorParams::new()
            .with_http_code(StatusCode::SERVICE_UNAVAILABLE)
            .with_code(code)
            .with_message(message),
    )
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

pub async fn database_health(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    let pool = state
        .pool
        .as_ref()
        .ok_or_else(|| not_configured(ErrorCode::DbError, "database is not configured"))?;

    sqlx::query("SELECT 1").execute(pool).await?;
    Ok("OK")
}

pub async fn issue_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<IssueTokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let mut payload = request.claims;
    payload.insert("sub".to_string(), Value::String(request.subject));

    let token = state.jwt.generate_jwt(payload, state.token_expiry)?;
    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in: state.token_expiry.num_seconds(),
    }))
}

pub async fn me(BearerClaims(claims): BearerClaims) -> Json<Claims> {
    Json(claims)
}

pub async fn encrypt_secret(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<EncryptRequest>,
) -> Result<Json<Value>, ApiError> {
    let sealed = state.crypto.encrypt(&request.plaintext)?;
    Ok(Json(json!({
        "ciphertext": sealed.map(|bytes| STANDARD.encode(bytes)),
    })))
}

pub async fn decrypt_secret(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<DecryptRequest>,
) -> Result<Json<Value>, ApiError> {
    let data = STANDARD
        .decode(request.ciphertext.as_bytes())
        .map_err(|_| bad_input("ciphertext must be valid base64"))?;

    let plaintext = state.crypto.decrypt(&data)?;
    Ok(Json(json!({ "plaintext": plaintext })))
}

pub async fn hash_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<HashPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let crypto = state.crypto.clone();
    let hash = tokio::task::spawn_blocking(move || crypto.hash_password(&request.password))
        .await
        .map_err(CodedError::internal_server_error)??;

    Ok(Json(json!({ "hash": hash })))
}

pub async fn verify_password(
    ValidatedJson(request): ValidatedJson<VerifyPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let matches = tokio::task::spawn_blocking(move || {
        compare_password(&request.hash, &request.password)
    })
    .await
    .map_err(CodedError::internal_server_error)?;

    if !matches {
        return Err(CodedError::new(
            ErrorParams::new()
                .with_http_code(StatusCode::UNAUTHORIZED)
                .with_code(ErrorCode::InvalidCredentials)
                .with_message("invalid credentials"),
        )
        .into());
    }

    Ok(Json(json!({ "valid": true })))
}

pub async fn publish_event(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PublishEventRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let queue = state
        .queue
        .as_ref()
        .ok_or_else(|| not_configured(ErrorCode::InternalServer, "queue is not configured"))?;

    let envelope = MessageEnvelope {
        kind: request.kind,
        data: request.data,
    };
    let message_id = send_envelope(queue.client.as_ref(), &queue.queue_url, &envelope).await?;

    Ok((StatusCode::ACCEPTED, Json(json!({ "message_id": message_id }))))
}
