use std::io;

use thiserror::Error;

/// Library-wide error type for reposeed operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue. Fatal for the whole run.
    #[error("{0}")]
    Configuration(String),

    /// Local workflow source directory is missing, empty, or holds invalid YAML.
    #[error("Workflow source error: {0}")]
    WorkflowSource(String),

    /// Repository URL is not an owner/name pair on the configured git host.
    #[error("Invalid repository URL '{0}': expected <owner>/<repo> on the configured git host")]
    InvalidRepositoryUrl(String),

    /// Repository does not exist or the credential cannot see it.
    #[error("Repository {repo} not found or not accessible (HTTP {status})")]
    NotFoundOrForbidden { repo: String, status: u16 },

    /// Shallow clone failed.
    #[error("Failed to clone {repo}: {details}")]
    CloneError { repo: String, details: String },

    /// Commit or push to the default branch failed.
    #[error("Failed to push to {branch}: {details}")]
    PushError { branch: String, details: String },

    /// Repository public key could not be retrieved or decoded.
    #[error("Failed to get public key for {repo}: {details}")]
    KeyFetchError { repo: String, details: String },

    /// Binary was built without sealed-box encryption support.
    #[error("Secret encryption unavailable: rebuild with the `sealed-box` feature")]
    EncryptionUnavailable,

    /// Secret create-or-update call was rejected.
    #[error("Failed to set secret {name}: {details}")]
    SecretUpsertError { name: String, details: String },

    /// Actions permissions update was rejected.
    #[error("Failed to update workflow permissions: {0}")]
    PermissionsUpdate(String),

    /// Transport or unexpected response from the remote API.
    #[error("API error: {0}")]
    Api(String),

    /// Git execution failed.
    #[error("Git error running '{command}': {details}")]
    Git { command: String, details: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Whether this error must abort the run before any repository is touched.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Configuration(_) | AppError::WorkflowSource(_) | AppError::TomlParse(_)
        )
    }

    /// Short machine-readable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Io(_) => "io",
            AppError::Configuration(_) | AppError::TomlParse(_) => "configuration",
            AppError::WorkflowSource(_) => "workflow_source",
            AppError::InvalidRepositoryUrl(_) => "invalid_repository_url",
            AppError::NotFoundOrForbidden { .. } => "not_found_or_forbidden",
            AppError::CloneError { .. } => "clone",
            AppError::PushError { .. } => "push",
            AppError::KeyFetchError { .. } => "key_fetch",
            AppError::EncryptionUnavailable => "encryption_unavailable",
            AppError::SecretUpsertError { .. } => "secret_upsert",
            AppError::PermissionsUpdate(_) => "permissions_update",
            AppError::Api(_) => "api",
            AppError::Git { .. } => "git",
        }
    }
}
