//! mockito-backed stand-in for the repository API.

use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use crypto_box::SecretKey;
use crypto_box::aead::OsRng;
use mockito::{Matcher, Mock, Server, ServerGuard};

/// Mock API with a real repository keypair so sealed values can be opened.
pub(crate) struct GitHubApi {
    pub(crate) server: ServerGuard,
    secret_key: SecretKey,
    received: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

impl GitHubApi {
    pub(crate) fn new() -> Self {
        Self {
            server: Server::new(),
            secret_key: SecretKey::generate(&mut OsRng),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn url(&self) -> String {
        self.server.url()
    }

    /// Repository exists; key and permission endpoints succeed.
    pub(crate) fn repository(&mut self, owner: &str, name: &str) -> Vec<Mock> {
        let base = format!("/repos/{}/{}", owner, name);
        let key = STANDARD.encode(self.secret_key.public_key().as_bytes());
        vec![
            self.server.mock("GET", base.as_str()).with_status(200).with_body("{}").create(),
            self.server
                .mock("GET", format!("{}/actions/secrets/public-key", base).as_str())
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(format!(r#"{{"key_id": "kid-{}", "key": "{}"}}"#, name, key))
                .create(),
            self.server
                .mock("PUT", format!("{}/actions/permissions", base).as_str())
                .with_status(204)
                .create(),
            self.server
                .mock("PUT", format!("{}/actions/permissions/workflow", base).as_str())
                .with_status(204)
                .create(),
        ]
    }

    /// Repository does not exist for this credential.
    pub(crate) fn missing(&mut self, owner: &str, name: &str) -> Mock {
        self.server
            .mock("GET", format!("/repos/{}/{}", owner, name).as_str())
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create()
    }

    /// Secret upserts for the repository answer `status` and record their bodies.
    pub(crate) fn secrets(&mut self, owner: &str, name: &str, status: usize) -> Mock {
        let received = Arc::clone(&self.received);
        let pattern = format!(r"^/repos/{}/{}/actions/secrets/[A-Z0-9_]+$", owner, name);
        self.server
            .mock("PUT", Matcher::Regex(pattern))
            .with_status(status)
            .with_body_from_request(move |request| {
                let body: serde_json::Value =
                    serde_json::from_slice(request.body().unwrap()).unwrap();
                received.lock().unwrap().push((request.path().to_string(), body));
                Vec::new()
            })
            .create()
    }

    /// Access check that must never be reached.
    pub(crate) fn untouched(&mut self, owner: &str, name: &str) -> Mock {
        self.server
            .mock("GET", format!("/repos/{}/{}", owner, name).as_str())
            .with_status(200)
            .expect(0)
            .create()
    }

    /// Decrypted `(path, plaintext)` pairs of every upsert received so far.
    pub(crate) fn opened_secrets(&self) -> Vec<(String, String)> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|(path, body)| {
                let sealed = STANDARD.decode(body["encrypted_value"].as_str().unwrap()).unwrap();
                let plain = self.secret_key.unseal(&sealed).unwrap();
                (path.clone(), String::from_utf8(plain).unwrap())
            })
            .collect()
    }
}
