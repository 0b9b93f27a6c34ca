//! Coded errors and their HTTP rendering
//!
//! A [`CodedError`] carries an HTTP status, an application [`ErrorCode`], a
//! client-facing message and an optional cause. Handlers return [`ApiError`],
//! which is either coded or an unexpected failure that renders as a generic
//! 500.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::codes::ErrorCode;

/// Boxed cause attached to a coded error
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

const DEFAULT_MESSAGE: &str = "internal server error";
const UNCODED_MESSAGE: &str = "Internal Server Error";

/// Error value rendered to API clients with a stable status and code
#[derive(Debug)]
pub struct CodedError {
    http_code: StatusCode,
    code: ErrorCode,
    message: String,
    source: Option<BoxError>,
}

/// Optional overrides applied on top of the coded error defaults.
///
/// Every field is explicit: `None` keeps the default, `Some` replaces it.
#[derive(Debug, Default)]
pub struct ErrorParams {
    pub http_code: Option<StatusCode>,
    pub code: Option<ErrorCode>,
    pub message: Option<String>,
    pub source: Option<BoxError>,
}

impl ErrorParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_code(mut self, http_code: StatusCode) -> Self {
        self.http_code = Some(http_code);
        self
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl CodedError {
    /// Build a coded error: 500 / internal-server / "internal server error"
    /// unless overridden by `params`.
    pub fn new(params: ErrorParams) -> Self {
        Self {
            http_code: params
                .http_code
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code: params.code.unwrap_or(ErrorCode::InternalServer),
            message: params
                .message
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            source: params.source,
        }
    }

    pub fn http_code(&self) -> StatusCode {
        self.http_code
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// 404 with the business-logic not-found code
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            ErrorParams::new()
                .with_http_code(StatusCode::NOT_FOUND)
                .with_code(ErrorCode::NotFound)
                .with_message(message),
        )
    }

    /// 500 keeping `err` as the logged cause; the client only sees the
    /// generic message.
    pub fn internal_server_error(err: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorParams::new()
                .with_http_code(StatusCode::INTERNAL_SERVER_ERROR)
                .with_code(ErrorCode::InternalServer)
                .with_message(DEFAULT_MESSAGE)
                .with_source(err),
        )
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            ErrorParams::new()
                .with_http_code(StatusCode::UNAUTHORIZED)
                .with_code(ErrorCode::Unauthorized)
                .with_message(message),
        )
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            ErrorParams::new()
                .with_http_code(StatusCode::FORBIDDEN)
                .with_code(ErrorCode::Forbidden)
                .with_message(message),
        )
    }
}

impl std::fmt::Display for CodedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (code: {}, http: {})",
            self.message,
            self.code,
            self.http_code.as_u16()
        )?;
        if let Some(source) = &self.source {
            write!(f, " -> {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for CodedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Error type returned by HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Coded(#[from] CodedError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Coded(e) => e.http_code(),
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Application code, absent for uncoded failures
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ApiError::Coded(e) => Some(e.code()),
            ApiError::Unexpected(_) => None,
        }
    }

    /// Message safe to show to clients
    pub fn public_message(&self) -> &str {
        match self {
            ApiError::Coded(e) => e.message(),
            ApiError::Unexpected(_) => UNCODED_MESSAGE,
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

/// Handler error attached to the response so outer middleware can log and
/// re-render it.
#[derive(Debug, Clone)]
pub struct RecordedError(Arc<ApiError>);

impl RecordedError {
    pub fn new(error: ApiError) -> Self {
        Self(Arc::new(error))
    }

    pub fn error(&self) -> &ApiError {
        &self.0
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            message: self.0.public_message().to_string(),
            code: self.0.error_code(),
        }
    }

    /// Render as `(status, json body)` without re-attaching the record
    pub fn to_response(&self) -> Response {
        (self.0.status_code(), Json(self.body())).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let recorded = RecordedError::new(self);
        let mut response = recorded.to_response();
        response.extensions_mut().insert(recorded);
        response
    }
}

impl IntoResponse for CodedError {
    fn into_response(self) -> Response {
        ApiError::Coded(self).into_response()
    }
}
