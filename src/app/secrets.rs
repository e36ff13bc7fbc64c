//! Encrypt-and-upsert of configured secrets for one repository.

use tracing::{debug, warn};

use crate::domain::{
    AppError, Failure, RepositoryPublicKey, RepositoryTarget, SecretMap, SecretOutcome,
    SecretPayload, SecretStatus, UpsertKind,
};
use crate::ports::{GitHubPort, SecretSealer};

pub struct SecretPublisher<'a, H: GitHubPort, S: SecretSealer> {
    github: &'a H,
    sealer: &'a S,
}

impl<'a, H: GitHubPort, S: SecretSealer> SecretPublisher<'a, H, S> {
    pub fn new(github: &'a H, sealer: &'a S) -> Self {
        Self { github, sealer }
    }

    /// Seal `value` against `key` for the repository.
    pub fn encrypt(
        &self,
        target: &RepositoryTarget,
        key: &RepositoryPublicKey,
        name: &str,
        value: &str,
    ) -> Result<SecretPayload, AppError> {
        let encrypted_value =
            self.sealer.seal(&key.key, value.as_bytes()).map_err(|e| match e {
                AppError::KeyFetchError { details, .. } => {
                    AppError::KeyFetchError { repo: target.full_name(), details }
                }
                other => other,
            })?;
        Ok(SecretPayload { name: name.to_string(), encrypted_value, key_id: key.key_id.clone() })
    }

    /// Upsert every secret that has a value, in configuration order.
    ///
    /// The public key is fetched once; if that fails every pending secret is
    /// recorded as failed with the key error. Each secret is otherwise isolated.
    pub fn publish_all(
        &self,
        target: &RepositoryTarget,
        secrets: &SecretMap,
    ) -> Vec<SecretOutcome> {
        let pending: Vec<(&str, &str)> = secrets.present().collect();
        if pending.is_empty() {
            return Vec::new();
        }

        let key = match self.github.public_key(target) {
            Ok(key) => key,
            Err(e) => {
                warn!(repo = %target, error = %e, "public key unavailable");
                let failure = Failure::from(&e);
                return pending
                    .into_iter()
                    .map(|(name, _)| SecretOutcome {
                        name: name.to_string(),
                        status: SecretStatus::Failed(failure.clone()),
                    })
                    .collect();
            }
        };

        pending
            .into_iter()
            .map(|(name, value)| {
                let status = match self.publish_one(target, &key, name, value) {
                    Ok(UpsertKind::Created) => SecretStatus::Created,
                    Ok(UpsertKind::Updated) => SecretStatus::Updated,
                    Err(e) => {
                        warn!(repo = %target, secret = name, error = %e, "secret not set");
                        SecretStatus::Failed(Failure::from(&e))
                    }
                };
                SecretOutcome { name: name.to_string(), status }
            })
            .collect()
    }

    fn publish_one(
        &self,
        target: &RepositoryTarget,
        key: &RepositoryPublicKey,
        name: &str,
        value: &str,
    ) -> Result<UpsertKind, AppError> {
        let payload = self.encrypt(target, key, name, value)?;
        let kind = self.github.upsert_secret(target, &payload)?;
        debug!(repo = %target, secret = name, ?kind, "secret upserted");
        Ok(kind)
    }
}
