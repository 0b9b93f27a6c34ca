//! Token authentication for svckit services
//!
//! Issues and verifies JWTs signed with HMAC or RSA keys and provides an
//! axum extractor that works with any state implementing
//! `FromRef<S>` for `Arc<JwtManager>`.

mod claims;
mod config;
mod error;
mod extractors;
mod jwt;
mod keys;

pub use claims::{Claims, Payload};
pub use config::JwtConfig;
pub use error::{AuthError, JwtError};
pub use extractors::BearerClaims;
pub use jsonwebtoken::Algorithm;
pub use jwt::JwtManager;
pub use keys::{load_rsa_private_key_from_bytes, load_rsa_public_key_from_bytes};
