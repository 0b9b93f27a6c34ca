//! Crypto errors and their coded mapping

use svckit_common::{ApiError, CodedError, ErrorCode, ErrorParams, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("encryption key must be 16, 24, or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("{0} is not configured")]
    MissingSecret(&'static str),

    #[error("data too short")]
    DataTooShort,

    #[error("encryption failed")]
    Encryption,

    #[error("decryption failed")]
    Decryption,

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("invalid HMAC key")]
    HmacKey,
}

impl CryptoError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CryptoError::InvalidKeyLength(_) => ErrorCode::FailedToGetAesKey,
            CryptoError::MissingSecret(_) => ErrorCode::InternalServer,
            CryptoError::Encryption => ErrorCode::FailedToEncrypt,
            CryptoError::DataTooShort | CryptoError::Decryption => ErrorCode::FailedToDecrypt,
            CryptoError::Hashing(_) | CryptoError::HmacKey => ErrorCode::HashingFailed,
        }
    }
}

impl From<CryptoError> for CodedError {
    fn from(err: CryptoError) -> Self {
        let message = match &err {
            CryptoError::InvalidKeyLength(_) | CryptoError::MissingSecret(_) => {
                "encryption is not configured"
            }
            CryptoError::Encryption => "failed to encrypt data",
            CryptoError::DataTooShort | CryptoError::Decryption => "failed to decrypt data",
            CryptoError::Hashing(_) | CryptoError::HmacKey => "failed to hash value",
        };

        CodedError::new(
            ErrorParams::new()
                .with_http_code(StatusCode::INTERNAL_SERVER_ERROR)
                .with_code(err.error_code())
                .with_message(message)
                .with_source(err),
        )
    }
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        ApiError::Coded(err.into())
    }
}
