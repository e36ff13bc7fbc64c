use sha2::{Digest, Sha256};

/// Directory inside a repository that holds CI workflow definitions.
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// A workflow definition file copied verbatim into each target repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFile {
    pub filename: String,
    pub content: Vec<u8>,
}

impl WorkflowFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self { filename: filename.into(), content: content.into() }
    }

    /// Hex-encoded SHA-256 of the file content.
    pub fn digest(&self) -> String {
        Sha256::digest(&self.content).iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Path of this file relative to a repository root.
    pub fn repo_path(&self) -> String {
        format!("{}/{}", WORKFLOWS_DIR, self.filename)
    }
}

/// Whether `filename` looks like a workflow definition.
pub fn is_workflow_filename(filename: &str) -> bool {
    filename.ends_with(".yml") || filename.ends_with(".yaml")
}
