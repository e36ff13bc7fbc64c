//! Per-repository results and the aggregate batch report.

use serde::Serialize;

use crate::domain::AppError;

/// Recorded failure, detached from the error value that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: String,
    pub message: String,
}

impl From<&AppError> for Failure {
    fn from(error: &AppError) -> Self {
        Self { kind: error.kind().to_string(), message: error.to_string() }
    }
}

impl From<AppError> for Failure {
    fn from(error: AppError) -> Self {
        Self::from(&error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkflowOutcome {
    /// A commit touching `files` was pushed to `branch`.
    Pushed { branch: String, files: Vec<String> },
    /// Every workflow file already matched; nothing committed.
    Unchanged,
    Failed(Failure),
}

impl WorkflowOutcome {
    pub fn is_ok(&self) -> bool {
        !matches!(self, WorkflowOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PermissionsOutcome {
    Updated,
    Failed(Failure),
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SecretStatus {
    Created,
    Updated,
    Failed(Failure),
}

impl SecretStatus {
    pub fn is_ok(&self) -> bool {
        !matches!(self, SecretStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: SecretStatus,
}

/// Overall classification of one repository's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoStatus {
    Success,
    Partial,
    Failed,
}

/// Outcome of processing one repository. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub repository: String,
    pub workflow: WorkflowOutcome,
    pub permissions: PermissionsOutcome,
    pub secrets: Vec<SecretOutcome>,
}

impl RunResult {
    /// Result for a target rejected before any mutating step.
    pub fn rejected(repository: impl Into<String>, error: &AppError) -> Self {
        Self {
            repository: repository.into(),
            workflow: WorkflowOutcome::Failed(error.into()),
            permissions: PermissionsOutcome::NotAttempted,
            secrets: Vec::new(),
        }
    }

    pub fn status(&self) -> RepoStatus {
        let workflow_ok = self.workflow.is_ok();
        let permissions_ok = matches!(self.permissions, PermissionsOutcome::Updated);
        let secrets_ok = self.secrets.iter().filter(|s| s.status.is_ok()).count();

        if workflow_ok && permissions_ok && secrets_ok == self.secrets.len() {
            RepoStatus::Success
        } else if !workflow_ok && !permissions_ok && secrets_ok == 0 {
            RepoStatus::Failed
        } else {
            RepoStatus::Partial
        }
    }

    /// Display name: the last URL path segment.
    pub fn short_name(&self) -> &str {
        let trimmed = self.repository.trim_end_matches('/');
        let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
        last.strip_suffix(".git").unwrap_or(last)
    }
}

/// Success ratio for one secret name across the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretRatio {
    pub name: String,
    pub succeeded: usize,
    pub attempted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub partial: usize,
    pub failed: usize,
    pub secrets: Vec<SecretRatio>,
}

impl Summary {
    pub fn from_results(results: &[RunResult]) -> Self {
        let mut summary =
            Self { total: results.len(), succeeded: 0, partial: 0, failed: 0, secrets: Vec::new() };

        for result in results {
            match result.status() {
                RepoStatus::Success => summary.succeeded += 1,
                RepoStatus::Partial => summary.partial += 1,
                RepoStatus::Failed => summary.failed += 1,
            }

            for secret in &result.secrets {
                let index = match summary.secrets.iter().position(|r| r.name == secret.name) {
                    Some(index) => index,
                    None => {
                        summary.secrets.push(SecretRatio {
                            name: secret.name.clone(),
                            succeeded: 0,
                            attempted: 0,
                        });
                        summary.secrets.len() - 1
                    }
                };
                let ratio = &mut summary.secrets[index];
                ratio.attempted += 1;
                if secret.status.is_ok() {
                    ratio.succeeded += 1;
                }
            }
        }

        summary
    }
}

/// Process exit classification for a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    Success,
    PartialFailure,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::PartialFailure => 2,
        }
    }
}

/// Aggregate report, built only after every repository has been processed.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: String,
    pub finished_at: String,
    pub results: Vec<RunResult>,
    pub summary: Summary,
}

impl BatchReport {
    pub fn new(started_at: String, finished_at: String, results: Vec<RunResult>) -> Self {
        let summary = Summary::from_results(&results);
        Self { started_at, finished_at, results, summary }
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.summary.failed > 0 {
            ExitStatus::Failure
        } else if self.summary.partial > 0 {
            ExitStatus::PartialFailure
        } else {
            ExitStatus::Success
        }
    }
}
