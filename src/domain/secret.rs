use std::fmt;

/// A repository's current public key for secret encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPublicKey {
    pub key_id: String,
    /// Base64-encoded X25519 public key.
    pub key: String,
}

/// Encrypted secret ready for the upsert call. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPayload {
    pub name: String,
    /// Base64-encoded sealed-box ciphertext.
    pub encrypted_value: String,
    pub key_id: String,
}

impl fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPayload")
            .field("name", &self.name)
            .field("key_id", &self.key_id)
            .field("encrypted_value_len", &self.encrypted_value.len())
            .finish()
    }
}

/// Result of a successful upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Created,
    Updated,
}
