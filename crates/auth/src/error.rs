//! Token and authentication errors

use axum::response::{IntoResponse, Response};
use svckit_common::{ApiError, CodedError, ErrorCode, ErrorParams, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("empty {0} key bytes")]
    EmptyKey(&'static str),

    #[error("invalid key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("algorithm {0:?} is not supported for this key type")]
    UnsupportedAlgorithm(jsonwebtoken::Algorithm),

    #[error("JWT_SECRET is not configured")]
    MissingSecret,

    #[error("no signing key configured")]
    MissingSigningKey,

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("unexpected signing method")]
    UnexpectedSigningMethod,

    #[error("invalid token: token has expired")]
    Expired,

    #[error("invalid token")]
    InvalidToken(#[source] Option<jsonwebtoken::errors::Error>),
}

impl JwtError {
    /// True for failures caused by the presented token rather than our setup
    pub fn is_verification(&self) -> bool {
        matches!(
            self,
            JwtError::UnexpectedSigningMethod | JwtError::Expired | JwtError::InvalidToken(_)
        )
    }
}

impl From<JwtError> for CodedError {
    fn from(err: JwtError) -> Self {
        let params = if err.is_verification() {
            ErrorParams::new()
                .with_http_code(StatusCode::UNAUTHORIZED)
                .with_code(ErrorCode::TokenValidation)
                .with_message(err.to_string())
        } else {
            ErrorParams::new()
                .with_http_code(StatusCode::INTERNAL_SERVER_ERROR)
                .with_code(ErrorCode::TokenGeneration)
                .with_message("failed to generate token")
        };
        CodedError::new(params.with_source(err))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::Coded(err.into())
    }
}

/// Rejection raised by the bearer extractor
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header required")]
    MissingAuthorization,

    #[error("invalid authorization header format")]
    InvalidAuthorizationFormat,

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl From<AuthError> for CodedError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Token(e) => e.into(),
            other => CodedError::unauthorized(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        CodedError::from(self).into_response()
    }
}
