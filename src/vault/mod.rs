// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret store access: authentication, path parsing and KV v2 reads.

pub mod client;
pub mod path;

pub use client::{ClientSettings, VaultClient};
pub use path::SecretPath;

use crate::error::Result;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;

/// Field-name to value mapping of a KV v2 secret
pub type SecretData = serde_json::Map<String, serde_json::Value>;

/// How to obtain a session token
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    /// Pre-issued token; when present no login is performed
    pub static_token: Option<Session>,
    pub role: String,
    pub auth_method: String,
    /// File holding the bootstrap credential (service-account JWT)
    pub bootstrap_token_file: Option<PathBuf>,
}

/// Authenticated session token, valid for this process only
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// A store the sync engine can read certificate secrets from
pub trait SecretProvider {
    fn authenticate(&self, auth: &AuthSettings) -> impl Future<Output = Result<Session>> + Send;

    fn fetch_secret(
        &self,
        session: &Session,
        path: &SecretPath,
    ) -> impl Future<Output = Result<SecretData>> + Send;
}
