use crate::domain::{AppError, RepositoryPublicKey, RepositoryTarget, SecretPayload, UpsertKind};

/// Subset of the remote repository API used by a batch run.
pub trait GitHubPort {
    /// Succeeds when the repository exists and the credential can see it.
    fn verify_access(&self, target: &RepositoryTarget) -> Result<(), AppError>;

    /// Enable Actions and grant workflows read/write permission. Idempotent.
    fn enable_actions_permissions(&self, target: &RepositoryTarget) -> Result<(), AppError>;

    /// Fetch the key used to seal secrets for this repository.
    fn public_key(&self, target: &RepositoryTarget) -> Result<RepositoryPublicKey, AppError>;

    /// Create or update a secret. Succeeds whether or not the name already exists.
    fn upsert_secret(
        &self,
        target: &RepositoryTarget,
        payload: &SecretPayload,
    ) -> Result<UpsertKind, AppError>;
}
