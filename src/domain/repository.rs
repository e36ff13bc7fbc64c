//! Repository targets parsed from operator-supplied URLs.

use std::fmt;

use url::Url;

use crate::domain::AppError;

/// Owner/name pair identifying one remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryTarget {
    pub owner: String,
    pub name: String,
}

impl RepositoryTarget {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self { owner: owner.into(), name: name.into() }
    }

    /// Parse an HTTPS (`https://host/owner/repo[.git]`) or SCP-style SSH
    /// (`git@host:owner/repo[.git]`) URL.
    ///
    /// The host must match `git_base`, since every clone and API call goes
    /// there; a `file://` base accepts any host. The path must contain exactly
    /// two non-empty segments.
    pub fn parse(raw: &str, git_base: &Url) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidRepositoryUrl(raw.to_string());
        let trimmed = raw.trim();

        let (host, path) = if let Some(rest) = trimmed.strip_prefix("git@") {
            let (host, path) = rest.split_once(':').ok_or_else(invalid)?;
            (host.to_string(), path.to_string())
        } else {
            let url = Url::parse(trimmed).map_err(|_| invalid())?;
            if !matches!(url.scheme(), "https" | "http" | "ssh") {
                return Err(invalid());
            }
            let host = url.host_str().ok_or_else(invalid)?.to_string();
            (host, url.path().to_string())
        };

        if !serves_host(git_base, &host) {
            return Err(invalid());
        }

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let segments: Vec<&str> = path.split('/').collect();

        match segments.as_slice() {
            [owner, name] if is_valid_segment(owner) && is_valid_segment(name) => {
                Ok(Self::new(*owner, *name))
            }
            _ => Err(invalid()),
        }
    }

    /// `owner/name` form used in API paths and log lines.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Clone URL under `git_base_url`.
    ///
    /// HTTP(S) bases carry the token as `x-access-token` basic credentials;
    /// other schemes (e.g. `file://`) are returned without credentials.
    pub fn clone_url(&self, git_base_url: &Url, token: &str) -> Result<String, AppError> {
        let mut url = git_base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}/{}/{}.git", base_path, self.owner, self.name));

        if matches!(url.scheme(), "https" | "http") {
            url.set_username("x-access-token")
                .and_then(|_| url.set_password(Some(token)))
                .map_err(|_| {
                    AppError::config_error(format!(
                        "git_base_url '{}' cannot carry credentials",
                        git_base_url
                    ))
                })?;
        }

        Ok(url.to_string())
    }
}

impl fmt::Display for RepositoryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn serves_host(git_base: &Url, host: &str) -> bool {
    git_base.scheme() == "file"
        || git_base.host_str().is_some_and(|expected| expected.eq_ignore_ascii_case(host))
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
