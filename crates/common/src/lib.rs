//! Shared building blocks for svckit services
//!
//! This crate provides the pieces every other svckit crate leans on:
//! - Application error codes and the coded error model
//! - Request body and Postgres error classification
//! - Configuration from environment variables
//! - Logger construction

pub mod codes;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod validation;

pub use codes::{ErrorCategory, ErrorCode};
pub use config::{get_env, get_env_parsed, Config};
pub use db::{postgres_error, DbFailure};
pub use error::{ApiError, BoxError, CodedError, ErrorBody, ErrorParams, RecordedError};
pub use extractors::ValidatedJson;
pub use logging::{LogConfig, LogFormat, LogGuard, Logger, LoggingError};
pub use validation::{bad_request, RequestBodyError};

/// Re-exported so crates mapping into coded errors need not depend on axum
pub use axum::http::StatusCode;
