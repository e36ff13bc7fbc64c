//! Bare git remotes on disk, addressed through `file://` URLs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A directory of bare remotes laid out as `<root>/<owner>/<name>.git`.
pub(crate) struct GitRemotes {
    root: TempDir,
}

impl GitRemotes {
    pub(crate) fn new() -> Self {
        Self { root: TempDir::new().expect("Failed to create temp directory for remotes") }
    }

    /// Value for `settings.git_base_url`.
    pub(crate) fn base_url(&self) -> String {
        format!("file://{}", self.root.path().display())
    }

    fn bare_path(&self, owner: &str, name: &str) -> PathBuf {
        self.root.path().join(owner).join(format!("{}.git", name))
    }

    /// Create a bare remote on `main` whose first commit holds `files`.
    pub(crate) fn create(&self, owner: &str, name: &str, files: &[(&str, &str)]) {
        let bare = self.bare_path(owner, name);
        fs::create_dir_all(&bare).unwrap();
        git(&bare, &["init", "--bare", "--initial-branch=main"]);

        let seed = self.root.path().join(format!(".seed-{}-{}", owner, name));
        fs::create_dir_all(&seed).unwrap();
        git(&seed, &["init", "--initial-branch=main"]);
        fs::write(seed.join("README.md"), format!("# {}\n", name)).unwrap();
        for (path, content) in files {
            let full = seed.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        git(&seed, &["add", "."]);
        git(
            &seed,
            &["-c", "user.name=Seed", "-c", "user.email=seed@example.com", "commit", "-m", "seed"],
        );
        git(&seed, &["push", bare.to_str().unwrap(), "main"]);
        fs::remove_dir_all(&seed).unwrap();
    }

    /// Install a pre-receive hook that rejects every push.
    #[cfg(unix)]
    pub(crate) fn protect(&self, owner: &str, name: &str) {
        use std::os::unix::fs::PermissionsExt;

        let hook = self.bare_path(owner, name).join("hooks").join("pre-receive");
        fs::create_dir_all(hook.parent().unwrap()).unwrap();
        let script = "#!/bin/sh\n\
            echo 'protected branch: changes must be made through a pull request' >&2\n\
            exit 1\n";
        fs::write(&hook, script).unwrap();
        fs::set_permissions(&hook, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub(crate) fn commit_count(&self, owner: &str, name: &str) -> usize {
        let bare = self.bare_path(owner, name);
        git(&bare, &["rev-list", "--count", "main"]).parse().unwrap()
    }

    /// Files touched by the tip commit of `main`.
    pub(crate) fn last_commit_files(&self, owner: &str, name: &str) -> Vec<String> {
        let bare = self.bare_path(owner, name);
        git(&bare, &["show", "--name-only", "--pretty=format:", "main"])
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn last_commit_message(&self, owner: &str, name: &str) -> String {
        let bare = self.bare_path(owner, name);
        git(&bare, &["log", "-1", "--pretty=%s", "main"])
    }

    pub(crate) fn read(&self, owner: &str, name: &str, path: &str) -> Option<String> {
        let bare = self.bare_path(owner, name);
        let output = Command::new("git")
            .args(["show", &format!("main:{}", path)])
            .current_dir(&bare)
            .output()
            .expect("failed to spawn git");
        output.status.success().then(|| String::from_utf8_lossy(&output.stdout).to_string())
    }
}
