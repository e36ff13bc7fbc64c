//! Sequential batch driver with per-repository failure isolation.

use std::path::PathBuf;
use std::thread;

use chrono::Utc;
use tracing::{debug, info, info_span, warn};
use url::Url;

use crate::app::AppContext;
use crate::app::copier::WorkflowCopier;
use crate::app::secrets::SecretPublisher;
use crate::domain::{
    AppError, BatchReport, Configuration, Failure, PermissionsOutcome, RepositoryTarget,
    RunResult, SecretStatus, WorkflowFile, WorkflowOutcome,
};
use crate::ports::{GitHubPort, GitPort, SecretSealer};

/// Where human-readable progress lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Stdout,
    Stderr,
    Silent,
}

impl Progress {
    fn line(self, text: &str) {
        match self {
            Progress::Stdout => println!("{}", text),
            Progress::Stderr => eprintln!("{}", text),
            Progress::Silent => {}
        }
    }
}

pub struct Orchestrator<'a, H: GitHubPort, G: GitPort, S: SecretSealer> {
    ctx: &'a AppContext<H, G, S>,
    config: &'a Configuration,
    workflows: &'a [WorkflowFile],
    git_base: Url,
    temp_root: Option<PathBuf>,
    progress: Progress,
}

impl<'a, H: GitHubPort, G: GitPort, S: SecretSealer> Orchestrator<'a, H, G, S> {
    pub fn new(
        ctx: &'a AppContext<H, G, S>,
        config: &'a Configuration,
        workflows: &'a [WorkflowFile],
    ) -> Result<Self, AppError> {
        let git_base = config.settings.git_base()?;
        Ok(Self { ctx, config, workflows, git_base, temp_root: None, progress: Progress::Stdout })
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Place per-repository working trees under `root`.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Process every configured repository in order and build the report.
    pub fn run(&self) -> BatchReport {
        let started_at = Utc::now().to_rfc3339();
        let total = self.config.repositories.len();
        let mut results = Vec::with_capacity(total);

        self.progress.line(&format!("📋 Processing {} repositories...", total));
        let missing = self.config.secrets.missing();
        if !missing.is_empty() {
            self.progress
                .line(&format!("⚠️  Skipping secrets without a value: {}", missing.join(", ")));
        }

        for (index, url) in self.config.repositories.iter().enumerate() {
            self.progress.line(&format!("\n[{}/{}] {}", index + 1, total, "=".repeat(40)));
            results.push(self.process_repository(url));

            if index + 1 < total && !self.config.settings.repo_delay().is_zero() {
                thread::sleep(self.config.settings.repo_delay());
            }
        }

        BatchReport::new(started_at, Utc::now().to_rfc3339(), results)
    }

    /// Process one repository. Never fails: every error is recorded in the result.
    pub fn process_repository(&self, url: &str) -> RunResult {
        let span = info_span!("repository", url = %url);
        let _guard = span.enter();
        self.progress.line(&format!("🔄 Processing repository: {}", url));
        debug!(stage = "pending");

        let target = match RepositoryTarget::parse(url, &self.git_base) {
            Ok(target) => target,
            Err(e) => return self.reject(url, e),
        };
        if let Err(e) = self.ctx.github().verify_access(&target) {
            return self.reject(url, e);
        }

        let workflow = self.copy_workflows(&target);
        let permissions = self.enable_permissions(&target);

        debug!(stage = "setting-secrets");
        self.progress.line("   🔐 Setting repository secrets...");
        let publisher = SecretPublisher::new(self.ctx.github(), self.ctx.sealer());
        let secrets = publisher.publish_all(&target, &self.config.secrets);
        for outcome in &secrets {
            match &outcome.status {
                SecretStatus::Created => {
                    self.progress.line(&format!("   ✅ Secret {} created", outcome.name));
                }
                SecretStatus::Updated => {
                    self.progress.line(&format!("   ✅ Secret {} updated", outcome.name));
                }
                SecretStatus::Failed(failure) => {
                    self.progress.line(&format!("   ❌ {}", failure.message));
                }
            }
        }

        let result = RunResult { repository: url.to_string(), workflow, permissions, secrets };
        info!(stage = "done", status = ?result.status(), "repository processed");
        result
    }

    fn reject(&self, url: &str, error: AppError) -> RunResult {
        warn!(stage = "failed", error = %error, "repository rejected");
        self.progress.line(&format!("   ❌ {}", error));
        RunResult::rejected(url, &error)
    }

    fn copy_workflows(&self, target: &RepositoryTarget) -> WorkflowOutcome {
        self.progress.line("   🚀 Syncing workflows...");
        let mut copier =
            WorkflowCopier::new(self.ctx.git(), &self.config.settings.commit_message);
        if let Some(root) = &self.temp_root {
            copier = copier.with_temp_root(root);
        }

        let outcome = target
            .clone_url(&self.git_base, self.config.token.expose())
            .and_then(|clone_url| copier.apply(&clone_url, target, self.workflows));

        match outcome {
            Ok(outcome) => {
                self.announce(&outcome);
                outcome
            }
            Err(e) => {
                warn!(stage = "failed", error = %e, "workflow sync failed");
                self.progress.line(&format!("   ❌ {}", e));
                WorkflowOutcome::Failed(Failure::from(&e))
            }
        }
    }

    fn announce(&self, outcome: &WorkflowOutcome) {
        match outcome {
            WorkflowOutcome::Unchanged => {
                self.progress.line("   ℹ️  Workflows already up to date");
            }
            WorkflowOutcome::Pushed { branch, files } => {
                for file in files {
                    self.progress.line(&format!("   📋 Copied {}", file));
                }
                self.progress.line(&format!("   📤 Pushed to {}", branch));
            }
            WorkflowOutcome::Failed(failure) => {
                self.progress.line(&format!("   ❌ {}", failure.message));
            }
        }
    }

    fn enable_permissions(&self, target: &RepositoryTarget) -> PermissionsOutcome {
        self.progress.line("   🔧 Updating workflow permissions...");
        match self.ctx.github().enable_actions_permissions(target) {
            Ok(()) => {
                self.progress.line("   ✅ Workflow permissions set to read/write");
                PermissionsOutcome::Updated
            }
            Err(e) => {
                warn!(error = %e, "permissions update failed");
                self.progress.line(&format!("   ❌ {}", e));
                PermissionsOutcome::Failed(Failure::from(&e))
            }
        }
    }
}
