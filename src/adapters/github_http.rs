//! GitHub REST API client implementation using reqwest.

use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    AppError, RepositoryPublicKey, RepositoryTarget, SecretPayload, Settings, Token, UpsertKind,
};
use crate::ports::GitHubPort;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const X_GITHUB_API_VERSION: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Blocking HTTP client for the repository API.
///
/// Every call is followed by a fixed pause; there is no retry or adaptive backoff.
#[derive(Clone)]
pub struct HttpGitHubClient {
    token: Token,
    api_url: String,
    call_delay: Duration,
    client: Client,
}

impl std::fmt::Debug for HttpGitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGitHubClient")
            .field("api_url", &self.api_url)
            .field("call_delay", &self.call_delay)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl HttpGitHubClient {
    /// Create a client for the API base and pacing in `settings`.
    pub fn new(token: Token, settings: &Settings) -> Result<Self, AppError> {
        let api_url = settings.api_base()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            token,
            api_url: api_url.as_str().trim_end_matches('/').to_string(),
            call_delay: settings.call_delay(),
            client,
        })
    }

    fn repo_url(&self, target: &RepositoryTarget, suffix: &str) -> String {
        format!("{}/repos/{}/{}{}", self.api_url, target.owner, target.name, suffix)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, format!("Bearer {}", self.token.expose()))
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(X_GITHUB_API_VERSION, API_VERSION)
            .header(USER_AGENT, concat!("reposeed/", env!("CARGO_PKG_VERSION")))
    }

    /// Send the request, then pause for the configured delay regardless of outcome.
    fn send(&self, builder: RequestBuilder) -> Result<Response, AppError> {
        let result = self
            .authorized(builder)
            .send()
            .map_err(|e| AppError::Api(format!("HTTP request failed: {}", e)));
        if !self.call_delay.is_zero() {
            thread::sleep(self.call_delay);
        }
        result
    }

    fn put_json<T: Serialize>(&self, url: &str, body: &T) -> Result<Response, AppError> {
        self.send(self.client.put(url).json(body))
    }
}

#[derive(Debug, Serialize)]
struct ActionsPermissionsRequest {
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct WorkflowPermissionsRequest {
    default_workflow_permissions: &'static str,
    can_approve_pull_request_reviews: bool,
}

#[derive(Debug, Deserialize)]
struct PublicKeyResponse {
    key_id: String,
    key: String,
}

#[derive(Debug, Serialize)]
struct SecretRequest<'a> {
    encrypted_value: &'a str,
    key_id: &'a str,
}

impl GitHubPort for HttpGitHubClient {
    fn verify_access(&self, target: &RepositoryTarget) -> Result<(), AppError> {
        let response = self.send(self.client.get(self.repo_url(target, "")))?;
        let status = response.status();
        debug!(repo = %target, status = status.as_u16(), "repository access check");

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                Err(AppError::NotFoundOrForbidden {
                    repo: target.full_name(),
                    status: status.as_u16(),
                })
            }
            _ => Err(AppError::Api(describe_failure(response))),
        }
    }

    fn enable_actions_permissions(&self, target: &RepositoryTarget) -> Result<(), AppError> {
        let response = self.put_json(
            &self.repo_url(target, "/actions/permissions"),
            &ActionsPermissionsRequest { enabled: true },
        )?;
        debug!(repo = %target, status = response.status().as_u16(), "enable actions");
        if !response.status().is_success() {
            return Err(AppError::PermissionsUpdate(describe_failure(response)));
        }

        let response = self.put_json(
            &self.repo_url(target, "/actions/permissions/workflow"),
            &WorkflowPermissionsRequest {
                default_workflow_permissions: "write",
                can_approve_pull_request_reviews: true,
            },
        )?;
        debug!(repo = %target, status = response.status().as_u16(), "workflow permissions");
        if !response.status().is_success() {
            return Err(AppError::PermissionsUpdate(describe_failure(response)));
        }

        Ok(())
    }

    fn public_key(&self, target: &RepositoryTarget) -> Result<RepositoryPublicKey, AppError> {
        let key_error =
            |details: String| AppError::KeyFetchError { repo: target.full_name(), details };

        let response = self
            .send(self.client.get(self.repo_url(target, "/actions/secrets/public-key")))
            .map_err(|e| key_error(e.to_string()))?;
        debug!(repo = %target, status = response.status().as_u16(), "public key fetch");

        if !response.status().is_success() {
            return Err(key_error(describe_failure(response)));
        }

        let body: PublicKeyResponse = response
            .json()
            .map_err(|e| key_error(format!("Failed to parse response: {}", e)))?;

        Ok(RepositoryPublicKey { key_id: body.key_id, key: body.key })
    }

    fn upsert_secret(
        &self,
        target: &RepositoryTarget,
        payload: &SecretPayload,
    ) -> Result<UpsertKind, AppError> {
        let upsert_error =
            |details: String| AppError::SecretUpsertError { name: payload.name.clone(), details };

        let response = self
            .put_json(
                &self.repo_url(target, &format!("/actions/secrets/{}", payload.name)),
                &SecretRequest {
                    encrypted_value: &payload.encrypted_value,
                    key_id: &payload.key_id,
                },
            )
            .map_err(|e| upsert_error(e.to_string()))?;
        let status = response.status();
        debug!(repo = %target, secret = %payload.name, status = status.as_u16(), "secret upsert");

        match status {
            StatusCode::CREATED => Ok(UpsertKind::Created),
            StatusCode::NO_CONTENT => Ok(UpsertKind::Updated),
            _ => Err(upsert_error(describe_failure(response))),
        }
    }
}

/// Status line plus a bounded excerpt of the body.
fn describe_failure(response: Response) -> String {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    let body = body.trim();
    let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();

    let label = if status == StatusCode::TOO_MANY_REQUESTS {
        "HTTP 429 (rate limited)".to_string()
    } else {
        format!("HTTP {}", status.as_u16())
    };

    if excerpt.is_empty() { label } else { format!("{} - {}", label, excerpt) }
}
