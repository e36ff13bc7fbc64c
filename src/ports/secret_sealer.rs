use crate::domain::AppError;

/// Public-key sealing of plaintext secret values.
pub trait SecretSealer {
    /// Seal `plaintext` for the holder of `public_key` (base64) and return
    /// base64 ciphertext.
    fn seal(&self, public_key: &str, plaintext: &[u8]) -> Result<String, AppError>;
}
