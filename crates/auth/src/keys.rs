//! RSA key loading from PEM bytes

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::error::JwtError;

/// Parse an RSA private key (PKCS#1 or PKCS#8 PEM) for signing
pub fn load_rsa_private_key_from_bytes(pem: &[u8]) -> Result<EncodingKey, JwtError> {
    if pem.is_empty() {
        return Err(JwtError::EmptyKey("private"));
    }
    EncodingKey::from_rsa_pem(pem).map_err(JwtError::InvalidKey)
}

/// Parse an RSA public key PEM for verification
pub fn load_rsa_public_key_from_bytes(pem: &[u8]) -> Result<DecodingKey, JwtError> {
    if pem.is_empty() {
        return Err(JwtError::EmptyKey("public"));
    }
    DecodingKey::from_rsa_pem(pem).map_err(JwtError::InvalidKey)
}
