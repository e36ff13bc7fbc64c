//! Sealed-box encryption of secret values (libsodium `crypto_box_seal` compatible).

use crate::domain::AppError;
use crate::ports::SecretSealer;

/// Seals values against a repository's X25519 public key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SealedBoxSealer;

impl SealedBoxSealer {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "sealed-box")]
impl SecretSealer for SealedBoxSealer {
    fn seal(&self, public_key: &str, plaintext: &[u8]) -> Result<String, AppError> {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD;
        use crypto_box::PublicKey;
        use crypto_box::aead::OsRng;

        let key_error = |details: String| AppError::KeyFetchError {
            repo: "public key".to_string(),
            details,
        };

        let raw = STANDARD
            .decode(public_key.trim())
            .map_err(|e| key_error(format!("Public key is not valid base64: {}", e)))?;
        let bytes: [u8; crypto_box::KEY_SIZE] = raw.as_slice().try_into().map_err(|_| {
            key_error(format!(
                "Public key must be {} bytes, got {}",
                crypto_box::KEY_SIZE,
                raw.len()
            ))
        })?;

        let sealed = PublicKey::from(bytes)
            .seal(&mut OsRng, plaintext)
            .map_err(|e| AppError::Api(format!("Sealing failed: {}", e)))?;

        Ok(STANDARD.encode(sealed))
    }
}

#[cfg(not(feature = "sealed-box"))]
impl SecretSealer for SealedBoxSealer {
    fn seal(&self, _public_key: &str, _plaintext: &[u8]) -> Result<String, AppError> {
        Err(AppError::EncryptionUnavailable)
    }
}
