//! Field encryption and hashing for svckit services
//!
//! - [`cipher`]: AES-GCM with a random nonce prepended to the ciphertext
//! - [`hash`]: bcrypt passwords and HMAC-SHA256 lookup hashes
//! - [`otp`]: numeric one-time codes

pub mod cipher;
pub mod config;
pub mod error;
pub mod hash;
pub mod otp;

pub use cipher::{decrypt, encrypt, AesKey, Cipher};
pub use config::CryptoConfig;
pub use error::CryptoError;
pub use hash::{bcrypt_cost_from_env, compare_password, hash_password, hash_text, verify_text_hash};
pub use otp::generate_otp;
