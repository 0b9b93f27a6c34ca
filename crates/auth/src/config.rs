//! Token configuration

use std::env;

use jsonwebtoken::Algorithm;
use svckit_common::{get_env, get_env_parsed};

use crate::error::JwtError;
use crate::jwt::JwtManager;

const DEFAULT_ISSUER: &str = "svckit";
const DEFAULT_EXPIRY_SECS: i64 = 3600;

/// HS256 signing configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    /// Lifetime of issued tokens
    pub expiry: chrono::Duration,
}

impl std::fmt::Debug for JwtConfig {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("expiry", &self.expiry)
            .finish()
    }
}

fn expiry_from_secs(secs: i64) -> chrono::Duration {
    chrono::Duration::try_seconds(secs).unwrap_or_else(|| {
        tracing::warn!(secs, "JWT_EXPIRY_SECS out of range, using default");
        chrono::Duration::seconds(DEFAULT_EXPIRY_SECS)
    })
}

impl JwtConfig {
    /// Load from `JWT_SECRET` (required), `JWT_ISSUER` and `JWT_EXPIRY_SECS`
    pub fn from_env() -> Result<Self, JwtError> {
        dotenvy::dotenv().ok();

        let secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(JwtError::MissingSecret)?;

        Ok(Self {
            secret,
            issuer: get_env("JWT_ISSUER", DEFAULT_ISSUER),
            expiry: expiry_from_secs(get_env_parsed("JWT_EXPIRY_SECS", DEFAULT_EXPIRY_SECS)),
        })
    }

    pub fn manager(&self) -> Result<JwtManager, JwtError> {
        JwtManager::hmac(Algorithm::HS256, self.secret.as_bytes(), self.issuer.clone())
    }
}
