//! Local workflow copier: clone, copy changed files, commit, push.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::domain::{AppError, RepositoryTarget, WORKFLOWS_DIR, WorkflowFile, WorkflowOutcome};
use crate::ports::GitPort;

const FALLBACK_BRANCH: &str = "main";

pub struct WorkflowCopier<'a, G: GitPort> {
    git: &'a G,
    commit_message: &'a str,
    temp_root: Option<PathBuf>,
}

impl<'a, G: GitPort> WorkflowCopier<'a, G> {
    pub fn new(git: &'a G, commit_message: &'a str) -> Self {
        Self { git, commit_message, temp_root: None }
    }

    /// Create working trees under `root` instead of the system temp directory.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Bring `target`'s workflow directory in line with `files`.
    ///
    /// The working tree lives in a `TempDir` that is removed on every return path.
    pub fn apply(
        &self,
        clone_url: &str,
        target: &RepositoryTarget,
        files: &[WorkflowFile],
    ) -> Result<WorkflowOutcome, AppError> {
        let workspace = self.workspace()?;
        let repo_dir = workspace.path().join(&target.name);

        debug!(repo = %target, stage = "cloning");
        self.git.clone_shallow(clone_url, &repo_dir).map_err(|e| AppError::CloneError {
            repo: target.full_name(),
            details: e.to_string(),
        })?;

        debug!(repo = %target, stage = "copying");
        let changed = copy_changed(&repo_dir, files)?;
        if changed.is_empty() {
            return Ok(WorkflowOutcome::Unchanged);
        }

        let branch = self.git.current_branch(&repo_dir).unwrap_or_else(|e| {
            warn!(
                repo = %target,
                error = %e,
                "could not read default branch, using {}",
                FALLBACK_BRANCH
            );
            FALLBACK_BRANCH.to_string()
        });

        debug!(repo = %target, stage = "pushing", branch = %branch, files = changed.len());
        let paths: Vec<String> =
            changed.iter().map(|f| format!("{}/{}", WORKFLOWS_DIR, f)).collect();
        let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let push_error = |e: AppError| AppError::PushError {
            branch: branch.clone(),
            details: e.to_string(),
        };

        self.git.commit_paths(&repo_dir, &path_refs, self.commit_message).map_err(push_error)?;
        self.git.push(&repo_dir, &branch).map_err(push_error)?;

        Ok(WorkflowOutcome::Pushed { branch, files: changed })
    }

    fn workspace(&self) -> Result<TempDir, AppError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("reposeed-");
        let dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

/// Write each file whose bytes differ from the checked-out copy. Returns the
/// filenames written, in input order.
fn copy_changed(repo_dir: &Path, files: &[WorkflowFile]) -> Result<Vec<String>, AppError> {
    let dest = repo_dir.join(WORKFLOWS_DIR);
    ensure_not_symlink(repo_dir, &repo_dir.join(".github"))?;
    ensure_not_symlink(repo_dir, &dest)?;
    fs::create_dir_all(&dest)?;

    let mut changed = Vec::new();
    for file in files {
        let path = dest.join(&file.filename);
        ensure_not_symlink(repo_dir, &path)?;
        let current = fs::read(&path).ok();
        if current.as_deref() == Some(file.content.as_slice()) {
            debug!(file = %file.filename, "unchanged");
            continue;
        }
        fs::write(&path, &file.content)?;
        changed.push(file.filename.clone());
    }
    Ok(changed)
}

/// Writes must stay inside the working tree, so a checked-in symlink on the
/// workflow path is a copy failure.
fn ensure_not_symlink(repo_dir: &Path, path: &Path) -> Result<(), AppError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let relative = path.strip_prefix(repo_dir).unwrap_or(path);
            Err(AppError::Io(io::Error::other(format!(
                "Refusing to write through symlink {}",
                relative.display()
            ))))
        }
        _ => Ok(()),
    }
}
