use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::GitPort;

/// In-memory remote: clone materializes the seeded files for a URL.
#[derive(Default)]
pub struct FakeGit {
    pub remotes: Mutex<HashMap<String, Vec<(String, Vec<u8>)>>>,
    pub links: Mutex<HashMap<String, Vec<(String, PathBuf)>>>,
    pub commits: Mutex<Vec<Vec<String>>>,
    pub pushes: Mutex<Vec<String>>,
    pub clone_dirs: Mutex<Vec<PathBuf>>,
    pub reject_push: Mutex<Option<String>>,
    pub branch: Mutex<String>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self { branch: Mutex::new("main".to_string()), ..Self::default() }
    }

    /// Register a remote whose default branch holds `files` (repo-relative paths).
    pub fn add_remote(&self, url: &str, files: &[(&str, &str)]) {
        let files = files.iter().map(|(p, c)| (p.to_string(), c.as_bytes().to_vec())).collect();
        self.remotes.lock().unwrap().insert(url.to_string(), files);
    }

    /// Check a symlink at `path` pointing to `target` into the remote's tree.
    pub fn add_link(&self, url: &str, path: &str, target: &Path) {
        self.links
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push((path.to_string(), target.to_path_buf()));
    }

    pub fn reject_pushes(&self, reason: &str) {
        *self.reject_push.lock().unwrap() = Some(reason.to_string());
    }

    pub fn commit_count(&self) -> usize {
        self.commits.lock().unwrap().len()
    }
}

impl GitPort for FakeGit {
    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<(), AppError> {
        let remotes = self.remotes.lock().unwrap();
        let files = remotes.get(url).ok_or_else(|| AppError::Git {
            command: format!("git clone {}", url),
            details: "repository not found".to_string(),
        })?;

        fs::create_dir_all(dest)?;
        for (path, content) in files {
            let full = dest.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(full, content)?;
        }
        #[cfg(unix)]
        for (path, target) in self.links.lock().unwrap().get(url).into_iter().flatten() {
            let full = dest.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            std::os::unix::fs::symlink(target, full)?;
        }
        self.clone_dirs.lock().unwrap().push(dest.to_path_buf());
        Ok(())
    }

    fn current_branch(&self, _repo: &Path) -> Result<String, AppError> {
        Ok(self.branch.lock().unwrap().clone())
    }

    fn commit_paths(&self, _repo: &Path, paths: &[&str], _message: &str) -> Result<(), AppError> {
        self.commits.lock().unwrap().push(paths.iter().map(|p| p.to_string()).collect());
        Ok(())
    }

    fn push(&self, _repo: &Path, branch: &str) -> Result<(), AppError> {
        if let Some(reason) = self.reject_push.lock().unwrap().as_ref() {
            return Err(AppError::Git {
                command: format!("git push origin HEAD:{}", branch),
                details: reason.clone(),
            });
        }
        self.pushes.lock().unwrap().push(branch.to_string());
        Ok(())
    }
}
