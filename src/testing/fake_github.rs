use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::{AppError, RepositoryPublicKey, RepositoryTarget, SecretPayload, UpsertKind};
use crate::ports::{GitHubPort, SecretSealer};

/// Records calls and keeps per-repository secret names to model create vs update.
#[derive(Default)]
pub struct FakeGitHub {
    pub calls: Mutex<Vec<String>>,
    pub missing_repos: Mutex<HashSet<String>>,
    pub failing_public_keys: Mutex<HashSet<String>>,
    pub failing_secrets: Mutex<HashSet<String>>,
    pub failing_permissions: Mutex<HashSet<String>>,
    pub stored: Mutex<Vec<(String, SecretPayload)>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_missing(&self, full_name: &str) {
        self.missing_repos.lock().unwrap().insert(full_name.to_string());
    }

    pub fn fail_public_key(&self, full_name: &str) {
        self.failing_public_keys.lock().unwrap().insert(full_name.to_string());
    }

    pub fn fail_secret(&self, name: &str) {
        self.failing_secrets.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_permissions(&self, full_name: &str) {
        self.failing_permissions.lock().unwrap().insert(full_name.to_string());
    }

    /// Secret names upserted for `full_name`, in call order.
    pub fn upserted_names(&self, full_name: &str) -> Vec<String> {
        self.stored
            .lock()
            .unwrap()
            .iter()
            .filter(|(repo, _)| repo == full_name)
            .map(|(_, payload)| payload.name.clone())
            .collect()
    }

    /// Calls recorded as `"<operation> <owner>/<name>"`.
    pub fn calls_for(&self, full_name: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split_once(' ').is_some_and(|(_, repo)| repo == full_name))
            .cloned()
            .collect()
    }

    fn record(&self, operation: &str, target: &RepositoryTarget) {
        self.calls.lock().unwrap().push(format!("{} {}", operation, target.full_name()));
    }
}

impl GitHubPort for FakeGitHub {
    fn verify_access(&self, target: &RepositoryTarget) -> Result<(), AppError> {
        self.record("verify_access", target);
        if self.missing_repos.lock().unwrap().contains(&target.full_name()) {
            return Err(AppError::NotFoundOrForbidden { repo: target.full_name(), status: 404 });
        }
        Ok(())
    }

    fn enable_actions_permissions(&self, target: &RepositoryTarget) -> Result<(), AppError> {
        self.record("enable_actions_permissions", target);
        if self.failing_permissions.lock().unwrap().contains(&target.full_name()) {
            return Err(AppError::PermissionsUpdate("HTTP 403".to_string()));
        }
        Ok(())
    }

    fn public_key(&self, target: &RepositoryTarget) -> Result<RepositoryPublicKey, AppError> {
        self.record("public_key", target);
        if self.failing_public_keys.lock().unwrap().contains(&target.full_name()) {
            return Err(AppError::KeyFetchError {
                repo: target.full_name(),
                details: "HTTP 500".to_string(),
            });
        }
        Ok(RepositoryPublicKey { key_id: "kid-1".to_string(), key: "pk".to_string() })
    }

    fn upsert_secret(
        &self,
        target: &RepositoryTarget,
        payload: &SecretPayload,
    ) -> Result<UpsertKind, AppError> {
        self.record("upsert_secret", target);
        if self.failing_secrets.lock().unwrap().contains(&payload.name) {
            return Err(AppError::SecretUpsertError {
                name: payload.name.clone(),
                details: "HTTP 422".to_string(),
            });
        }

        let full_name = target.full_name();
        let existed = self.upserted_names(&full_name).contains(&payload.name);
        self.stored.lock().unwrap().push((full_name, payload.clone()));
        Ok(if existed { UpsertKind::Updated } else { UpsertKind::Created })
    }
}

/// Deterministic sealer: `sealed(<key>):<plaintext>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeSealer;

impl SecretSealer for FakeSealer {
    fn seal(&self, public_key: &str, plaintext: &[u8]) -> Result<String, AppError> {
        Ok(format!("sealed({}):{}", public_key, String::from_utf8_lossy(plaintext)))
    }
}
