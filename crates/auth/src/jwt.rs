//! JWT issuance and verification

use axum::http::HeaderValue;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{Claims, Payload};
use crate::error::{AuthError, JwtError};
use crate::keys::{load_rsa_private_key_from_bytes, load_rsa_public_key_from_bytes};

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
const RSA_ALGORITHMS: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

/// Signs and verifies tokens with one algorithm and issuer
pub struct JwtManager {
    algorithm: Algorithm,
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
    issuer: String,
    leeway: u64,
}

impl std::fmt::Debug for JwtManager {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("algorithm", &self.algorithm)
            .field("can_sign", &self.encoding_key.is_some())
            .field("issuer", &self.issuer)
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl JwtManager {
    /// Shared-secret manager (HS256, HS384 or HS512)
    pub fn hmac(
        algorithm: Algorithm,
        secret: &[u8],
        issuer: impl Into<String>,
    ) -> Result<Self, JwtError> {
        if !HMAC_ALGORITHMS.contains(&algorithm) {
            return Err(JwtError::UnsupportedAlgorithm(algorithm));
        }
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        Ok(Self {
            algorithm,
            encoding_key: Some(EncodingKey::from_secret(secret)),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            leeway: 0,
        })
    }

    /// Key-pair manager (RS256, RS384 or RS512) from PEM bytes
    pub fn rsa(
        algorithm: Algorithm,
        private_pem: &[u8],
        public_pem: &[u8],
        issuer: impl Into<String>,
    ) -> Result<Self, JwtError> {
        let mut manager = Self::verify_only(algorithm, public_pem, issuer)?;
        manager.encoding_key = Some(load_rsa_private_key_from_bytes(private_pem)?);
        Ok(manager)
    }

    /// Manager holding only the RSA public key; it can verify but not issue
    pub fn verify_only(
        algorithm: Algorithm,
        public_pem: &[u8],
        issuer: impl Into<String>,
    ) -> Result<Self, JwtError> {
        if !RSA_ALGORITHMS.contains(&algorithm) {
            return Err(JwtError::UnsupportedAlgorithm(algorithm));
        }

        Ok(Self {
            algorithm,
            encoding_key: None,
            decoding_key: load_rsa_public_key_from_bytes(public_pem)?,
            issuer: issuer.into(),
            leeway: 0,
        })
    }

    /// Clock skew tolerated when checking `exp`, in seconds
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign `payload` with `iat = now` and `exp = now + expiry`
    pub fn generate_jwt(
        &self,
        payload: Payload,
        expiry: chrono::Duration,
    ) -> Result<String, JwtError> {
        let key = self
            .encoding_key
            .as_ref()
            .ok_or(JwtError::MissingSigningKey)?;

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(expiry)
            .ok_or(JwtError::ExpiryOutOfRange)?;
        let claims = Claims {
            payload,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, key).map_err(JwtError::Signing)
    }

    /// Verify signature, algorithm and expiry, returning the claims
    pub fn verify_jwt(&self, token: &str) -> Result<Claims, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::InvalidToken(Some(e)))?;
        if header.alg != self.algorithm {
            tracing::debug!(
                expected = ?self.algorithm,
                actual = ?header.alg,
                "JWT signed with unexpected algorithm"
            );
            return Err(JwtError::UnexpectedSigningMethod);
        }

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::InvalidToken(Some(e)),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<&str, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    match header_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::InvalidAuthorizationFormat),
    }
}
