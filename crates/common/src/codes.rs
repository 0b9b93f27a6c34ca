//! Application-wide error codes
//!
//! Codes are namespaced by range: 1000s generic, 2000s crypto,
//! 3000s database, 4000s business logic. The table is an enum so the
//! compiler rejects duplicate values.

use serde::{Serialize, Serializer};

/// Numeric application error code carried by every coded error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    // Generic
    InternalServer = 1000,
    InvalidRequest = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,

    // Crypto / security
    FailedToEncrypt = 2000,
    FailedToDecrypt = 2001,
    HashingFailed = 2002,
    TokenGeneration = 2003,
    TokenValidation = 2004,
    FailedToGetAesKey = 2005,

    // Database
    CreateFailed = 3000,
    UpdateFailed = 3001,
    DeleteFailed = 3002,
    FetchFailed = 3003,
    DbError = 3004,

    // Business logic
    InvalidCredentials = 4000,
    AlreadyExists = 4001,
    NotFound = 4002,
}

/// Range an error code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Generic,
    Crypto,
    Database,
    BusinessLogic,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 18] = [
        ErrorCode::InternalServer,
        ErrorCode::InvalidRequest,
        ErrorCode::Unauthorized,
        ErrorCode::Forbidden,
        ErrorCode::FailedToEncrypt,
        ErrorCode::FailedToDecrypt,
        ErrorCode::HashingFailed,
        ErrorCode::TokenGeneration,
        ErrorCode::TokenValidation,
        ErrorCode::FailedToGetAesKey,
        ErrorCode::CreateFailed,
        ErrorCode::UpdateFailed,
        ErrorCode::DeleteFailed,
        ErrorCode::FetchFailed,
        ErrorCode::DbError,
        ErrorCode::InvalidCredentials,
        ErrorCode::AlreadyExists,
        ErrorCode::NotFound,
    ];

    /// Integer value as sent to API clients
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Look up a code by its integer value
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_i32() == value)
    }

    pub fn category(self) -> ErrorCategory {
        match self.as_i32() {
            1000..=1999 => ErrorCategory::Generic,
            2000..=2999 => ErrorCategory::Crypto,
            3000..=3999 => ErrorCategory::Database,
            _ => ErrorCategory::BusinessLogic,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_i32())
    }
}
