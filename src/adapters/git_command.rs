use crate::domain::AppError;
use crate::ports::GitPort;
use git2::Repository;
use std::path::Path;
use std::process::Command;

const REDACTED: &str = "***";

/// Git subprocess adapter. Branch inspection goes through `git2`.
#[derive(Clone)]
pub struct GitCommandAdapter {
    committer_name: String,
    committer_email: String,
    redact: Vec<String>,
}

impl std::fmt::Debug for GitCommandAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCommandAdapter")
            .field("committer_name", &self.committer_name)
            .field("committer_email", &self.committer_email)
            .finish()
    }
}

impl GitCommandAdapter {
    pub fn new(committer_name: impl Into<String>, committer_email: impl Into<String>) -> Self {
        Self {
            committer_name: committer_name.into(),
            committer_email: committer_email.into(),
            redact: Vec::new(),
        }
    }

    /// Scrub `secret` from every command line and error message this adapter produces.
    pub fn redacting(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if !secret.is_empty() {
            self.redact.push(secret);
        }
        self
    }

    fn scrub(&self, text: &str) -> String {
        self.redact.iter().fold(text.to_string(), |acc, secret| acc.replace(secret, REDACTED))
    }

    fn run(&self, args: &[&str], cwd: Option<&Path>) -> Result<String, AppError> {
        let mut command = Command::new("git");
        command.args(args);
        command.env("GIT_TERMINAL_PROMPT", "0");
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let display = self.scrub(&format!("git {}", args.join(" ")));
        let output = command
            .output()
            .map_err(|e| AppError::Git { command: display.clone(), details: e.to_string() })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AppError::Git {
                command: display,
                details: if stderr.is_empty() {
                    "Unknown error".to_string()
                } else {
                    self.scrub(&stderr)
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitPort for GitCommandAdapter {
    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<(), AppError> {
        let dest_str = dest.to_string_lossy().into_owned();
        self.run(&["clone", "--depth", "1", "--quiet", url, dest_str.as_str()], None).map(|_| ())
    }

    fn current_branch(&self, repo: &Path) -> Result<String, AppError> {
        let repo = Repository::open(repo).map_err(|e| AppError::Git {
            command: "git2::Repository::open".to_string(),
            details: e.to_string(),
        })?;
        let head = repo.head().map_err(|e| AppError::Git {
            command: "git2::Repository::head".to_string(),
            details: e.to_string(),
        })?;
        head.shorthand().map(str::to_string).ok_or_else(|| AppError::Git {
            command: "git2::Reference::shorthand".to_string(),
            details: "HEAD is not a valid UTF-8 branch name".to_string(),
        })
    }

    fn commit_paths(&self, repo: &Path, paths: &[&str], message: &str) -> Result<(), AppError> {
        let mut add_args = vec!["add", "--"];
        add_args.extend_from_slice(paths);
        self.run(&add_args, Some(repo))?;

        let name = format!("user.name={}", self.committer_name);
        let email = format!("user.email={}", self.committer_email);
        self.run(
            &["-c", name.as_str(), "-c", email.as_str(), "commit", "--quiet", "-m", message],
            Some(repo),
        )
        .map(|_| ())
    }

    fn push(&self, repo: &Path, branch: &str) -> Result<(), AppError> {
        let refspec = format!("HEAD:refs/heads/{}", branch);
        self.run(&["push", "--quiet", "origin", refspec.as_str()], Some(repo)).map(|_| ())
    }
}
