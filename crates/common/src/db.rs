//! Postgres error classification
//!
//! Driver errors are first reduced to a [`DbFailure`] and then mapped to a
//! coded error, so the mapping table does not need a live database.

use axum::http::StatusCode;

use crate::codes::ErrorCode;
use crate::error::{ApiError, BoxError, CodedError, ErrorParams};

pub const UNIQUE_VIOLATION: &str = "23505";
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
pub const NOT_NULL_VIOLATION: &str = "23502";
pub const CHECK_VIOLATION: &str = "23514";

/// Shape of a database failure relevant to API responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbFailure {
    /// Query expected a row and found none
    NoRows,
    /// Error reported by the server, with its SQLSTATE when available
    Driver { code: Option<String> },
    /// Anything else (pool, IO, decoding)
    Other,
}

impl DbFailure {
    pub fn classify(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbFailure::NoRows,
            sqlx::Error::Database(db_err) => DbFailure::Driver {
                code: db_err.code().map(|c| c.into_owned()),
            },
            _ => DbFailure::Other,
        }
    }
}

/// Map a classified failure to a coded error keeping `source` as the cause
pub fn db_failure_error(failure: &DbFailure, source: impl Into<BoxError>) -> CodedError {
    let (http_code, code, message) = match failure {
        DbFailure::NoRows => (
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "resource not found",
        ),
        DbFailure::Driver { code } => match code.as_deref() {
            Some(UNIQUE_VIOLATION) => (
                StatusCode::CONFLICT,
                ErrorCode::AlreadyExists,
                "resource already exists",
            ),
            Some(FOREIGN_KEY_VIOLATION) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidRequest,
                "invalid reference, foreign key constraint failed",
            ),
            Some(NOT_NULL_VIOLATION) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidRequest,
                "required field missing",
            ),
            Some(CHECK_VIOLATION) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidRequest,
                "check constraint failed",
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DbError,
                "database error",
            ),
        },
        DbFailure::Other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServer,
            "internal server error",
        ),
    };

    CodedError::new(
        ErrorParams::new()
            .with_http_code(http_code)
            .with_code(code)
            .with_message(message)
            .with_source(source),
    )
}

/// Map a sqlx error to a coded error
pub fn postgres_error(err: sqlx::Error) -> CodedError {
    let failure = DbFailure::classify(&err);
    db_failure_error(&failure, err)
}

impl From<sqlx::Error> for CodedError {
    fn from(err: sqlx::Error) -> Self {
        postgres_error(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Coded(postgres_error(err))
    }
}
