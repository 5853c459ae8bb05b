// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: an in-memory secret provider and config fixtures.

use crate::config::Config;
use crate::error::{CertSyncError, Result};
use crate::vault::{AuthSettings, ClientSettings, SecretData, SecretPath, SecretProvider, Session};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use url::Url;

/// A provider that serves a fixed secret and counts calls.
pub struct FakeProvider {
    secret: Mutex<Option<SecretData>>,
    pub authentications: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl FakeProvider {
    pub fn with_secret(secret: SecretData) -> Self {
        Self {
            secret: Mutex::new(Some(secret)),
            authentications: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A provider whose store holds nothing at any path
    pub fn empty() -> Self {
        Self {
            secret: Mutex::new(None),
            authentications: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Replace the stored secret, simulating a rotation
    pub fn set_secret(&self, secret: SecretData) {
        *self.secret.lock().unwrap() = Some(secret);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl SecretProvider for FakeProvider {
    async fn authenticate(&self, auth: &AuthSettings) -> Result<Session> {
        self.authentications.fetch_add(1, Ordering::SeqCst);
        Ok(auth
            .static_token
            .clone()
            .unwrap_or_else(|| Session::new("s.fake")))
    }

    async fn fetch_secret(&self, _session: &Session, path: &SecretPath) -> Result<SecretData> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.secret
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CertSyncError::SecretNotFound(path.to_string()))
    }
}

/// Base64-encode a string the way certificate material is stored
pub fn b64(data: &str) -> String {
    BASE64.encode(data)
}

/// Build a secret mapping from `(field, value)` pairs
pub fn secret_data(fields: &[(&str, String)]) -> SecretData {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
        .collect()
}

/// Wrap a field mapping in a KV v2 read response body
pub fn kv_response(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "request_id": "00000000-0000-0000-0000-000000000000",
        "data": {
            "data": data,
            "metadata": { "version": 1, "destroyed": false }
        }
    })
}

/// Config writing into `dir`, reading `cert`/`key` fields from `kv/certs/example.com`
pub fn make_config(dir: &Path) -> Config {
    Config {
        secret_path: "kv/certs/example.com".to_string(),
        cert_field: Some("cert".to_string()),
        key_field: Some("key".to_string()),
        chain_field: None,
        full_chain_file: dir.join("tls").join("fullchain.pem"),
        key_file: dir.join("tls").join("key.pem"),
        sync_complete_command: None,
        vault_addr: Url::parse("https://127.0.0.1:8200").unwrap(),
        auth: AuthSettings {
            static_token: Some(Session::new("s.test")),
            role: String::new(),
            auth_method: "kubernetes".to_string(),
            bootstrap_token_file: None,
        },
        client: ClientSettings::default(),
    }
}
