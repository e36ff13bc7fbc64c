pub mod config;
pub mod error;
pub mod outcome;
pub mod repository;
pub mod secret;
pub mod workflow;

pub use config::{
    Configuration, Manifest, RECOGNIZED_SECRET_KEYS, SecretEntry, SecretMap, Settings, TOKEN_KEY,
    Token,
};
pub use error::AppError;
pub use outcome::{
    BatchReport, ExitStatus, Failure, PermissionsOutcome, RepoStatus, RunResult, SecretOutcome,
    SecretRatio, SecretStatus, Summary, WorkflowOutcome,
};
pub use repository::RepositoryTarget;
pub use secret::{RepositoryPublicKey, SecretPayload, UpsertKind};
pub use workflow::{WORKFLOWS_DIR, WorkflowFile, is_workflow_filename};
