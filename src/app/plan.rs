//! Offline preview of what a run would touch.

use std::fmt::Write;

use crate::domain::{AppError, Configuration, RepositoryTarget, WorkflowFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRepository {
    pub url: String,
    /// Parsed target, or the reason it would be rejected.
    pub target: Result<RepositoryTarget, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub repositories: Vec<PlannedRepository>,
    /// `(filename, sha256)` pairs.
    pub workflows: Vec<(String, String)>,
    pub secrets_sent: Vec<String>,
    pub secrets_skipped: Vec<String>,
}

impl Plan {
    pub fn build(config: &Configuration, workflows: &[WorkflowFile]) -> Result<Self, AppError> {
        let git_base = config.settings.git_base()?;
        let repositories = config
            .repositories
            .iter()
            .map(|url| PlannedRepository {
                url: url.clone(),
                target: RepositoryTarget::parse(url, &git_base).map_err(|e| e.to_string()),
            })
            .collect();

        Ok(Self {
            repositories,
            workflows: workflows.iter().map(|f| (f.filename.clone(), f.digest())).collect(),
            secrets_sent: config.secrets.present().map(|(name, _)| name.to_string()).collect(),
            secrets_skipped: config.secrets.missing().into_iter().map(str::to_string).collect(),
        })
    }

    pub fn invalid_count(&self) -> usize {
        self.repositories.iter().filter(|r| r.target.is_err()).count()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Repositories ({}):", self.repositories.len());
        for repo in &self.repositories {
            match &repo.target {
                Ok(target) => {
                    let _ = writeln!(out, "  ✅ {}", target);
                }
                Err(reason) => {
                    let _ = writeln!(out, "  ❌ {}", reason);
                }
            }
        }

        let _ = writeln!(out, "Workflow files ({}):", self.workflows.len());
        for (filename, digest) in &self.workflows {
            let _ = writeln!(out, "  {}  {}", &digest[..12.min(digest.len())], filename);
        }

        let _ = writeln!(out, "Secrets to set: {}", join_or_none(&self.secrets_sent));
        let _ =
            writeln!(out, "Secrets skipped (no value): {}", join_or_none(&self.secrets_skipped));
        out
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() { "(none)".to_string() } else { names.join(", ") }
}
