// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{env, vault};
use crate::error::{CertSyncError, Result};
use crate::vault::{AuthSettings, ClientSettings, Session};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use url::Url;

/// Command line flags. Every value can be overridden by its environment variable.
#[derive(Debug, Default, Parser)]
#[command(name = "vault-cert-sync", version, about = "Sync a TLS certificate from Vault to disk")]
pub struct Args {
    /// Vault KV v2 secret path, e.g. kv/certs/example.com
    #[arg(long = "vault-path")]
    pub vault_path: Option<String>,

    /// Full chain file path
    #[arg(long = "fullchain")]
    pub fullchain: Option<PathBuf>,

    /// Key file path
    #[arg(long = "key")]
    pub key: Option<PathBuf>,

    /// Command to run when the files changed
    #[arg(long = "complete-cmd")]
    pub complete_cmd: Option<String>,

    /// Secret field holding the base64 certificate
    #[arg(long = "vault-cert-field")]
    pub vault_cert_field: Option<String>,

    /// Secret field holding the base64 private key
    #[arg(long = "vault-key-field")]
    pub vault_key_field: Option<String>,

    /// Secret field holding the base64 intermediate chain
    #[arg(long = "vault-chain-field")]
    pub vault_chain_field: Option<String>,

    /// Vault address
    #[arg(long = "vault-addr")]
    pub vault_addr: Option<String>,

    /// Role used for the login exchange
    #[arg(long = "vault-role")]
    pub vault_role: Option<String>,

    /// Auth method mount used for the login exchange
    #[arg(long = "vault-auth-method")]
    pub vault_auth_method: Option<String>,

    /// PEM file with the CA certificate(s) that signed the Vault server certificate
    #[arg(long = "vault-cacert")]
    pub vault_cacert: Option<PathBuf>,

    /// Vault Enterprise namespace
    #[arg(long = "vault-namespace")]
    pub vault_namespace: Option<String>,
}

/// Resolved, read-only configuration for one sync cycle
#[derive(Debug, Clone)]
pub struct Config {
    pub secret_path: String,
    pub cert_field: Option<String>,
    pub key_field: Option<String>,
    pub chain_field: Option<String>,
    pub full_chain_file: PathBuf,
    pub key_file: PathBuf,
    pub sync_complete_command: Option<String>,
    pub vault_addr: Url,
    pub auth: AuthSettings,
    pub client: ClientSettings,
}

impl Config {
    /// Resolve configuration from the process environment
    pub fn from_env(args: Args) -> Result<Self> {
        Self::resolve(args, |name: &str| std::env::var_os(name))
    }

    /// Merge defaults, flags and environment (in increasing precedence).
    /// Empty values are treated as unset at every layer.
    pub fn resolve<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let env_os = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let env_str = |name: &str| -> Result<Option<String>> {
            env_os(name)
                .map(|v| {
                    v.into_string().map_err(|_| {
                        CertSyncError::ConfigInvalid(format!("{} is not valid UTF-8", name))
                    })
                })
                .transpose()
        };
        let pick = |name: &str, flag: Option<String>| -> Result<Option<String>> {
            Ok(env_str(name)?.or_else(|| flag.filter(|v| !v.is_empty())))
        };
        let pick_path = |name: &str, flag: Option<PathBuf>| -> Option<PathBuf> {
            env_os(name)
                .map(PathBuf::from)
                .or_else(|| flag.filter(|p| !p.as_os_str().is_empty()))
        };

        let secret_path = pick(env::VAULT_KV_PATH, args.vault_path)?.ok_or_else(|| {
            CertSyncError::ConfigInvalid(format!(
                "secret path is required (--vault-path or {})",
                env::VAULT_KV_PATH
            ))
        })?;
        let full_chain_file = pick_path(env::FULL_CHAIN_FILE, args.fullchain).ok_or_else(|| {
            CertSyncError::ConfigInvalid(format!(
                "full chain file path is required (--fullchain or {})",
                env::FULL_CHAIN_FILE
            ))
        })?;
        let key_file = pick_path(env::KEY_FILE, args.key).ok_or_else(|| {
            CertSyncError::ConfigInvalid(format!(
                "key file path is required (--key or {})",
                env::KEY_FILE
            ))
        })?;

        let addr = pick(env::VAULT_ADDR, args.vault_addr)?
            .unwrap_or_else(|| vault::DEFAULT_ADDR.to_string());
        let vault_addr = parse_vault_addr(&addr)?;

        let auth = AuthSettings {
            static_token: env_str(env::VAULT_TOKEN)?.map(Session::new),
            role: pick(env::VAULT_ROLE, args.vault_role)?.unwrap_or_default(),
            auth_method: pick(env::VAULT_AUTH_METHOD, args.vault_auth_method)?
                .unwrap_or_else(|| vault::DEFAULT_AUTH_METHOD.to_string()),
            bootstrap_token_file: pick_path(env::KUBE_TOKEN, None),
        };

        let client = ClientSettings {
            ca_cert: pick_path(env::VAULT_CACERT, args.vault_cacert),
            ca_path: pick_path(env::VAULT_CAPATH, None),
            skip_verify: env_str(env::VAULT_SKIP_VERIFY)?
                .map(|v| parse_bool(env::VAULT_SKIP_VERIFY, &v))
                .transpose()?
                .unwrap_or(false),
            namespace: pick(env::VAULT_NAMESPACE, args.vault_namespace)?,
        };

        Ok(Config {
            secret_path,
            cert_field: pick(env::VAULT_CERT_FIELD, args.vault_cert_field)?,
            key_field: pick(env::VAULT_KEY_FIELD, args.vault_key_field)?,
            chain_field: pick(env::VAULT_CHAIN_FIELD, args.vault_chain_field)?,
            full_chain_file,
            key_file,
            sync_complete_command: pick(env::SYNC_COMPLETE_COMMAND, args.complete_cmd)?,
            vault_addr,
            auth,
            client,
        })
    }
}

/// Boolean spellings accepted by the Vault CLI
fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(CertSyncError::ConfigInvalid(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

fn parse_vault_addr(addr: &str) -> Result<Url> {
    let url = Url::parse(addr)
        .map_err(|e| CertSyncError::ConfigInvalid(format!("invalid Vault address '{}': {}", addr, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CertSyncError::ConfigInvalid(format!(
            "unsupported Vault address scheme '{}' in '{}'",
            other, addr
        ))),
    }
}
