//! Run configuration domain models.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::domain::AppError;

/// Keys always offered as secrets, in upsert order.
pub const RECOGNIZED_SECRET_KEYS: [&str; 4] =
    ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_REGION", "AWS_BEDROCK_MODEL_ID"];

/// Name of the access token variable. Never treated as a secret to upsert.
pub const TOKEN_KEY: &str = "GITHUB_TOKEN";

/// Bearer credential for the remote API and git transport.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

/// One configured secret. `value` is `None` when absent or empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretEntry {
    pub name: String,
    pub value: Option<String>,
}

impl fmt::Debug for SecretEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretEntry")
            .field("name", &self.name)
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Ordered mapping from secret name to plaintext value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretMap {
    entries: Vec<SecretEntry>,
}

impl SecretMap {
    /// Insert or replace `name`, keeping the original position on replace.
    /// Empty values are stored as absent.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        let value = value.filter(|v| !v.is_empty());
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(SecretEntry { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.value.as_deref())
    }

    pub fn entries(&self) -> &[SecretEntry] {
        &self.entries
    }

    /// Entries with a value, in configuration order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.value.as_deref().map(|value| (entry.name.as_str(), value)))
    }

    /// Names of entries that will be skipped.
    pub fn missing(&self) -> Vec<&str> {
        self.entries.iter().filter(|entry| entry.value.is_none()).map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tunable settings from the `[settings]` table of `reposeed.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Local directory supplying workflow definition files.
    #[serde(default = "default_workflows_dir")]
    pub workflows_dir: PathBuf,
    /// Remote API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Host base for clone URLs.
    #[serde(default = "default_git_base_url")]
    pub git_base_url: String,
    /// Fixed pause after each remote API call.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Fixed pause between repositories.
    #[serde(default = "default_repo_delay_ms")]
    pub repo_delay_ms: u64,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
    #[serde(default = "default_committer_name")]
    pub committer_name: String,
    #[serde(default = "default_committer_email")]
    pub committer_email: String,
}

impl Settings {
    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn repo_delay(&self) -> Duration {
        Duration::from_millis(self.repo_delay_ms)
    }

    pub fn api_base(&self) -> Result<Url, AppError> {
        parse_base_url("api_url", &self.api_url)
    }

    pub fn git_base(&self) -> Result<Url, AppError> {
        parse_base_url("git_base_url", &self.git_base_url)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workflows_dir: default_workflows_dir(),
            api_url: default_api_url(),
            git_base_url: default_git_base_url(),
            delay_ms: default_delay_ms(),
            repo_delay_ms: default_repo_delay_ms(),
            timeout_secs: default_timeout(),
            commit_message: default_commit_message(),
            committer_name: default_committer_name(),
            committer_email: default_committer_email(),
        }
    }
}

fn default_workflows_dir() -> PathBuf {
    PathBuf::from(".github/workflows")
}

fn parse_base_url(field: &str, raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw)
        .map_err(|e| AppError::config_error(format!("Invalid {} '{}': {}", field, raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(AppError::config_error(format!("Invalid {} '{}': not a base URL", field, raw)));
    }
    Ok(url)
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_git_base_url() -> String {
    "https://github.com".to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_repo_delay_ms() -> u64 {
    2000
}

fn default_timeout() -> u64 {
    30
}

fn default_commit_message() -> String {
    "Add/Update GitHub Actions workflows".to_string()
}

fn default_committer_name() -> String {
    "reposeed".to_string()
}

fn default_committer_email() -> String {
    "reposeed@users.noreply.github.com".to_string()
}

/// On-disk shape of `reposeed.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub settings: Settings,
}

/// Configuration loaded once at start and read-only thereafter.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub token: Token,
    pub secrets: SecretMap,
    pub repositories: Vec<String>,
    pub settings: Settings,
}
