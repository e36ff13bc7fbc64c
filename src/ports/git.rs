use crate::domain::AppError;
use std::path::Path;

pub trait GitPort {
    /// Shallow-clone the default branch of `url` into `dest`.
    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<(), AppError>;

    /// Name of the branch checked out in `repo`.
    fn current_branch(&self, repo: &Path) -> Result<String, AppError>;

    /// Stage exactly `paths` (relative to `repo`) and commit them.
    fn commit_paths(&self, repo: &Path, paths: &[&str], message: &str) -> Result<(), AppError>;

    /// Push HEAD to `branch` on origin.
    fn push(&self, repo: &Path, branch: &str) -> Result<(), AppError>;
}
