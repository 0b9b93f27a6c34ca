//! Password hashing (bcrypt) and keyed text hashing (HMAC-SHA256)
//!
//! Empty inputs hash to an empty string so optional columns stay empty.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use svckit_common::get_env_parsed;

use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Cost used when `BCRYPT_COST` is unset or unparsable
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// `BCRYPT_COST` from the environment with [`DEFAULT_BCRYPT_COST`] fallback
pub fn bcrypt_cost_from_env() -> u32 {
    get_env_parsed("BCRYPT_COST", DEFAULT_BCRYPT_COST)
}

/// Salted bcrypt hash of `password` at `cost`
pub fn hash_password(password: &str, cost: u32) -> Result<String, CryptoError> {
    if password.is_empty() {
        return Ok(String::new());
    }
    Ok(bcrypt::hash(password, cost)?)
}

/// True only when `password` matches `hashed`. Malformed hashes never match.
pub fn compare_password(hashed: &str, password: &str) -> bool {
    if hashed.is_empty() {
        return false;
    }
    match bcrypt::verify(password, hashed) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::debug!(error = %e, "Stored password hash could not be verified");
            false
        }
    }
}

/// Lowercase hex HMAC-SHA256 of `value` keyed by `secret`
pub fn hash_text(value: &str, secret: &str) -> Result<String, CryptoError> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| CryptoError::HmacKey)?;
    mac.update(value.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check `value` against a hex digest from [`hash_text`] in constant time
pub fn verify_text_hash(value: &str, secret: &str, expected_hex: &str) -> bool {
    let expected = match hex::decode(expected_hex) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(value.as_bytes());
    mac.verify_slice(&expected).is_ok()
}
