//! Crypto configuration loaded from the environment

use std::env;

use crate::cipher::{self, Cipher};
use crate::error::CryptoError;
use crate::hash;

#[derive(Clone)]
pub struct CryptoConfig {
    /// AES key for field encryption (16, 24 or 32 bytes)
    pub encrypt_secret: Option<String>,
    pub bcrypt_cost: u32,
    /// HMAC key for lookup hashes
    pub hash_secret: Option<String>,
}

impl std::fmt::Debug for CryptoConfig {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoConfig")
            .field(
                "encrypt_secret",
                &self.encrypt_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field(
                "hash_secret",
                &self.hash_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl CryptoConfig {
    /// Load from `ENCRYPT_SECRET`, `BCRYPT_COST` and `HASH_SECRET`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            encrypt_secret: env::var("ENCRYPT_SECRET").ok().filter(|s| !s.is_empty()),
            bcrypt_cost: hash::bcrypt_cost_from_env(),
            hash_secret: env::var("HASH_SECRET").ok().filter(|s| !s.is_empty()),
        }
    }

    fn encrypt_secret(&self) -> Result<&str, CryptoError> {
        self.encrypt_secret
            .as_deref()
            .ok_or(CryptoError::MissingSecret("ENCRYPT_SECRET"))
    }

    fn hash_secret(&self) -> Result<&str, CryptoError> {
        self.hash_secret
            .as_deref()
            .ok_or(CryptoError::MissingSecret("HASH_SECRET"))
    }

    /// Cipher bound to the configured key, validated up front
    pub fn cipher(&self) -> Result<Cipher, CryptoError> {
        Cipher::from_secret(self.encrypt_secret()?)
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<Option<Vec<u8>>, CryptoError> {
        if plaintext.is_empty() {
            return Ok(None);
        }
        cipher::encrypt(plaintext, self.encrypt_secret()?)
    }

    pub fn decrypt(&self, data: &[u8]) -> Result<String, CryptoError> {
        cipher::decrypt(data, self.encrypt_secret()?)
    }

    pub fn hash_password(&self, password: &str) -> Result<String, CryptoError> {
        hash::hash_password(password, self.bcrypt_cost)
    }

    pub fn hash_text(&self, value: &str) -> Result<String, CryptoError> {
        hash::hash_text(value, self.hash_secret()?)
    }
}
