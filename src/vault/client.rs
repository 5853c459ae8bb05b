// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Vault HTTP client for token login and KV v2 reads.

use super::{AuthSettings, SecretData, SecretPath, SecretProvider, Session};
use crate::constants::{vault, APP_NAME};
use crate::error::{CertSyncError, Result};
use http::{Method, StatusCode};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

#[derive(Serialize)]
struct LoginRequest<'a> {
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    jwt: Option<&'a str>,
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: Option<LoginAuth>,
}

#[derive(Deserialize)]
struct LoginAuth {
    client_token: String,
}

/// KV v2 read body: `{ "data": { "data": {...}, "metadata": {...} } }`
#[derive(Deserialize)]
struct KvReadResponse {
    data: Option<KvVersion>,
}

#[derive(Deserialize)]
struct KvVersion {
    data: Option<serde_json::Value>,
}

#[derive(Deserialize, Default)]
struct VaultErrors {
    #[serde(default)]
    errors: Vec<String>,
}

/// Transport settings mirroring the Vault CLI environment
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    /// PEM bundle of extra trusted CAs (VAULT_CACERT)
    pub ca_cert: Option<PathBuf>,
    /// Directory of PEM files with extra trusted CAs (VAULT_CAPATH)
    pub ca_path: Option<PathBuf>,
    pub skip_verify: bool,
    /// Sent as `X-Vault-Namespace` on every request
    pub namespace: Option<String>,
}

/// Vault REST API client
#[derive(Debug, Clone)]
pub struct VaultClient {
    http: reqwest::Client,
    base_url: Url,
    namespace: Option<String>,
}

impl VaultClient {
    /// Build a client trusting the system roots plus any configured CAs
    pub fn new(base_url: Url, settings: &ClientSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")));

        let mut roots = Vec::new();
        if let Some(file) = &settings.ca_cert {
            roots.extend(load_ca_file(file)?);
        }
        if let Some(dir) = &settings.ca_path {
            roots.extend(load_ca_dir(dir)?);
        }
        for cert in roots {
            builder = builder.add_root_certificate(cert);
        }
        if settings.skip_verify {
            warn!("TLS certificate verification is disabled for {}", base_url);
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            namespace: settings.namespace.clone(),
        })
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.namespace {
            Some(ns) => builder.header(vault::NAMESPACE_HEADER, ns),
            None => builder,
        }
    }

    /// Build `<base>/v1/<api_path>`, percent-encoding each path segment
    fn endpoint(&self, api_path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CertSyncError::ConfigInvalid(format!(
                    "Vault address '{}' cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(api_path.split('/'));
        Ok(url)
    }

    /// Perform the role-based login exchange and return the client token
    #[instrument(skip(self, auth), fields(vault_addr = %self.base_url, auth_method = %auth.auth_method, role = %auth.role))]
    async fn login(&self, auth: &AuthSettings) -> Result<Session> {
        let jwt = match &auth.bootstrap_token_file {
            Some(path) => {
                debug!("Reading bootstrap credential from {}", path.display());
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    error!("Failed to read bootstrap credential {}: {}", path.display(), e);
                    CertSyncError::Provider(format!(
                        "failed to read bootstrap credential {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                // Token files written by kubelet may end with a newline
                Some(raw.trim().to_string())
            }
            None => None,
        };

        let url = self.endpoint(&format!("auth/{}/login", auth.auth_method))?;
        let body = LoginRequest {
            role: &auth.role,
            jwt: jwt.as_deref(),
        };

        let resp = self.request(Method::POST, url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let reason = error_reason(resp).await;
            error!("Login via {} failed with {}: {}", auth.auth_method, status, reason);
            return Err(CertSyncError::Provider(format!(
                "login via auth/{} failed with {}: {}",
                auth.auth_method, status, reason
            )));
        }

        let login: LoginResponse = resp.json().await?;
        let token = login.auth.map(|a| a.client_token).ok_or_else(|| {
            CertSyncError::Provider(format!(
                "login via auth/{} returned no client token",
                auth.auth_method
            ))
        })?;

        info!("Logged in to Vault via auth/{}", auth.auth_method);
        Ok(Session::new(token))
    }
}

impl SecretProvider for VaultClient {
    async fn authenticate(&self, auth: &AuthSettings) -> Result<Session> {
        if let Some(token) = &auth.static_token {
            info!("Using static Vault token, skipping login");
            return Ok(token.clone());
        }
        self.login(auth).await
    }

    #[instrument(skip(self, session), fields(vault_addr = %self.base_url, path = %path))]
    async fn fetch_secret(&self, session: &Session, path: &SecretPath) -> Result<SecretData> {
        let url = self.endpoint(&path.data_path())?;
        debug!("Reading {}", url);

        let resp = self
            .request(Method::GET, url)
            .header(vault::TOKEN_HEADER, session.token())
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            error!("Secret {} not found", path);
            return Err(CertSyncError::SecretNotFound(path.to_string()));
        }
        if !status.is_success() {
            let reason = error_reason(resp).await;
            error!("Reading secret {} failed with {}: {}", path, status, reason);
            return Err(CertSyncError::Provider(format!(
                "reading {} failed with {}: {}",
                path, status, reason
            )));
        }

        let body: KvReadResponse = resp.json().await?;
        match body.data.and_then(|d| d.data) {
            Some(serde_json::Value::Object(data)) => {
                debug!("Secret {} has {} fields", path, data.len());
                Ok(data)
            }
            _ => {
                error!("Secret {} has no data", path);
                Err(CertSyncError::SecretNotFound(path.to_string()))
            }
        }
    }
}

/// Parse every certificate in a PEM bundle
fn load_ca_file(file: &Path) -> Result<Vec<reqwest::Certificate>> {
    let pem = std::fs::read(file).map_err(|e| {
        CertSyncError::ConfigInvalid(format!("failed to read CA file {}: {}", file.display(), e))
    })?;
    let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
        CertSyncError::ConfigInvalid(format!("invalid CA file {}: {}", file.display(), e))
    })?;
    if certs.is_empty() {
        return Err(CertSyncError::ConfigInvalid(format!(
            "no certificates found in CA file {}",
            file.display()
        )));
    }
    debug!("Loaded {} CA certificates from {}", certs.len(), file.display());
    Ok(certs)
}

/// Load every PEM file in `dir`; files holding no certificate are skipped
fn load_ca_dir(dir: &Path) -> Result<Vec<reqwest::Certificate>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        CertSyncError::ConfigInvalid(format!("failed to read CA directory {}: {}", dir.display(), e))
    })?;
    let mut certs = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| {
                CertSyncError::ConfigInvalid(format!(
                    "failed to read CA directory {}: {}",
                    dir.display(),
                    e
                ))
            })?
            .path();
        if !path.is_file() {
            continue;
        }
        match load_ca_file(&path) {
            Ok(found) => certs.extend(found),
            Err(e) => debug!("Skipping {}: {}", path.display(), e),
        }
    }
    Ok(certs)
}

/// Summarise the `errors` array of a failed Vault response
async fn error_reason(resp: reqwest::Response) -> String {
    let errors = resp.json::<VaultErrors>().await.unwrap_or_default().errors;
    if errors.is_empty() {
        "no error details".to_string()
    } else {
        errors.join("; ")
    }
}
