//! AES-GCM encryption of individual string fields.
//!
//! Output layout is `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! A fresh random nonce is drawn from the OS CSPRNG for every call; the key
//! size (16, 24 or 32 bytes) selects AES-128, AES-192 or AES-256.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};

use crate::error::CryptoError;

/// Byte length of the GCM nonce prepended to every ciphertext
pub const NONCE_LEN: usize = 12;

/// Accepted key lengths in bytes
pub const KEY_LENGTHS: [usize; 3] = [16, 24, 32];

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Validated AES key
#[derive(Clone)]
pub struct AesKey(Vec<u8>);

impl AesKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if !KEY_LENGTHS.contains(&bytes.len()) {
            return Err(CryptoError::InvalidKeyLength(bytes.len()));
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Use the raw UTF-8 bytes of a configured secret as the key
    pub fn from_secret(secret: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(secret.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for AesKey {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AesKey([REDACTED; {}])", self.0.len())
    }
}

enum Engine {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

/// AES-GCM cipher bound to one key
pub struct Cipher {
    engine: Engine,
}

impl Cipher {
    pub fn new(key: &AesKey) -> Result<Self, CryptoError> {
        let invalid = |_| CryptoError::InvalidKeyLength(key.len());
        let engine = match key.len() {
            16 => Engine::Aes128(Aes128Gcm::new_from_slice(&key.0).map_err(invalid)?),
            24 => Engine::Aes192(Aes192Gcm::new_from_slice(&key.0).map_err(invalid)?),
            32 => Engine::Aes256(Aes256Gcm::new_from_slice(&key.0).map_err(invalid)?),
            other => return Err(CryptoError::InvalidKeyLength(other)),
        };
        Ok(Self { engine })
    }

    pub fn from_secret(secret: &str) -> Result<Self, CryptoError> {
        Self::new(&AesKey::from_secret(secret)?)
    }

    /// Encrypt `plaintext`. Empty input yields `None` instead of a ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> Result<Option<Vec<u8>>, CryptoError> {
        if plaintext.is_empty() {
            return Ok(None);
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::<U12>::from_slice(&nonce_bytes);

        let sealed = match &self.engine {
            Engine::Aes128(c) => c.encrypt(nonce, plaintext.as_bytes()),
            Engine::Aes192(c) => c.encrypt(nonce, plaintext.as_bytes()),
            Engine::Aes256(c) => c.encrypt(nonce, plaintext.as_bytes()),
        }
        .map_err(|_| CryptoError::Encryption)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&sealed);
        Ok(Some(out))
    }

    /// Split off the nonce, authenticate and decrypt
    pub fn decrypt(&self, data: &[u8]) -> Result<String, CryptoError> {
        if data.len() < NONCE_LEN {
            return Err(CryptoError::DataTooShort);
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
        let nonce = Nonce::<U12>::from_slice(nonce_bytes);

        let plaintext = match &self.engine {
            Engine::Aes128(c) => c.decrypt(nonce, ciphertext),
            Engine::Aes192(c) => c.decrypt(nonce, ciphertext),
            Engine::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
        .map_err(|_| CryptoError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::Decryption)
    }
}

/// Encrypt with a secret given as a string; see [`Cipher::encrypt`]
pub fn encrypt(plaintext: &str, secret: &str) -> Result<Option<Vec<u8>>, CryptoError> {
    if plaintext.is_empty() {
        return Ok(None);
    }
    Cipher::from_secret(secret)?.encrypt(plaintext)
}

/// Decrypt with a secret given as a string; see [`Cipher::decrypt`]
pub fn decrypt(data: &[u8], secret: &str) -> Result<String, CryptoError> {
    Cipher::from_secret(secret)?.decrypt(data)
}
