//! Loading of the fixed local workflow-file set.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::{AppError, WorkflowFile, is_workflow_filename};

/// Read every `.yml`/`.yaml` file directly under `dir`, sorted by filename.
///
/// Each file must parse as YAML. An empty set is an error.
pub fn load_workflow_files(dir: &Path) -> Result<Vec<WorkflowFile>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::WorkflowSource(format!(
            "Workflows directory '{}' not found",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_workflow_filename(&filename) {
            continue;
        }

        let content = fs::read(entry.path())?;
        serde_yaml::from_slice::<serde_yaml::Value>(&content).map_err(|e| {
            AppError::WorkflowSource(format!("{} is not valid YAML: {}", filename, e))
        })?;

        let file = WorkflowFile::new(filename, content);
        debug!(file = %file.filename, sha256 = %file.digest(), "workflow file loaded");
        files.push(file);
    }

    if files.is_empty() {
        return Err(AppError::WorkflowSource(format!(
            "No .yml or .yaml files in '{}'",
            dir.display()
        )));
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_yaml_files_sorted_and_skips_others() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("release.yaml"), "on: push\n").unwrap();
        fs::write(dir.path().join("ci.yml"), "name: CI\non: [push]\n").unwrap();
        fs::write(dir.path().join("notes.md"), "# notes").unwrap();
        fs::create_dir(dir.path().join("nested.yml")).unwrap();

        let files = load_workflow_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["ci.yml", "release.yaml"]);
        assert_eq!(files[0].content, b"name: CI\non: [push]\n");
    }

    #[test]
    fn missing_directory_is_workflow_source_error() {
        let dir = TempDir::new().unwrap();
        let err = load_workflow_files(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, AppError::WorkflowSource(_)));
    }

    #[test]
    fn empty_directory_is_workflow_source_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "x").unwrap();
        assert!(matches!(load_workflow_files(dir.path()), Err(AppError::WorkflowSource(_))));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.yml"), "jobs: [unclosed\n").unwrap();
        let err = load_workflow_files(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::WorkflowSource(ref m) if m.contains("broken.yml")));
    }
}
