//! Configuration loading from the manifest, dotenv file, and environment.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::dotenv::parse_dotenv;
use crate::domain::{
    AppError, Configuration, Manifest, RECOGNIZED_SECRET_KEYS, SecretMap, TOKEN_KEY, Token,
};

pub const DEFAULT_MANIFEST: &str = "reposeed.toml";
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit manifest path. Must exist when given.
    pub manifest: Option<PathBuf>,
    /// Explicit dotenv path. Must exist when given.
    pub env_file: Option<PathBuf>,
    /// Replaces the manifest repository list when non-empty.
    pub repositories: Vec<String>,
    pub workflows_dir: Option<PathBuf>,
    pub delay_ms: Option<u64>,
}

/// Build the run configuration.
///
/// `env` looks up process environment variables; it takes precedence over the
/// dotenv file for the token and every secret.
pub fn load_config<F>(options: &LoadOptions, env: F) -> Result<Configuration, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut manifest = read_manifest(options.manifest.as_deref())?;
    let dotenv = read_dotenv(options.env_file.as_deref())?;

    let lookup = |key: &str| -> Option<String> {
        env(key).filter(|v| !v.trim().is_empty()).or_else(|| {
            dotenv.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    };

    let token = lookup(TOKEN_KEY).and_then(|raw| Token::new(raw)).ok_or_else(|| {
        AppError::config_error(format!(
            "{} is not set. Export it or add it to {}.",
            TOKEN_KEY, DEFAULT_ENV_FILE
        ))
    })?;

    let mut secrets = SecretMap::default();
    for key in RECOGNIZED_SECRET_KEYS {
        secrets.insert(key, lookup(key));
    }
    for (key, _) in &dotenv {
        if key != TOKEN_KEY && !RECOGNIZED_SECRET_KEYS.contains(&key.as_str()) {
            secrets.insert(key.clone(), lookup(key));
        }
    }

    if !options.repositories.is_empty() {
        manifest.repositories = options.repositories.clone();
    }
    if manifest.repositories.is_empty() {
        return Err(AppError::config_error(format!(
            "No repositories configured. Add `repositories = [...]` to {} or pass --repo.",
            DEFAULT_MANIFEST
        )));
    }

    let mut settings = manifest.settings;
    if let Some(dir) = &options.workflows_dir {
        settings.workflows_dir = dir.clone();
    }
    if let Some(delay_ms) = options.delay_ms {
        settings.delay_ms = delay_ms;
    }
    settings.api_base()?;
    settings.git_base()?;

    debug!(
        repositories = manifest.repositories.len(),
        secrets = secrets.len(),
        "configuration loaded"
    );

    Ok(Configuration { token, secrets, repositories: manifest.repositories, settings })
}

fn read_manifest(explicit: Option<&Path>) -> Result<Manifest, AppError> {
    let Some(content) = read_optional(explicit, DEFAULT_MANIFEST)? else {
        return Ok(Manifest::default());
    };
    Ok(toml::from_str(&content)?)
}

fn read_dotenv(explicit: Option<&Path>) -> Result<Vec<(String, String)>, AppError> {
    Ok(read_optional(explicit, DEFAULT_ENV_FILE)?.map(|c| parse_dotenv(&c)).unwrap_or_default())
}

/// Explicit paths must exist; the default path is optional.
fn read_optional(explicit: Option<&Path>, default: &str) -> Result<Option<String>, AppError> {
    match explicit {
        Some(path) => fs::read_to_string(path).map(Some).map_err(|e| {
            AppError::config_error(format!("Failed to read {}: {}", path.display(), e))
        }),
        None => {
            let path = Path::new(default);
            if path.is_file() { Ok(Some(fs::read_to_string(path)?)) } else { Ok(None) }
        }
    }
}
