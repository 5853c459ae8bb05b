// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables consulted during configuration resolution
pub mod env {
    pub const VAULT_ADDR: &str = "VAULT_ADDR";
    pub const VAULT_KV_PATH: &str = "VAULT_KV_PATH";
    pub const FULL_CHAIN_FILE: &str = "FULL_CHAIN_FILE";
    pub const KEY_FILE: &str = "KEY_FILE";
    pub const SYNC_COMPLETE_COMMAND: &str = "SYNC_COMPLETE_COMMAND";
    pub const VAULT_CERT_FIELD: &str = "VAULT_CERT_FIELD";
    pub const VAULT_KEY_FIELD: &str = "VAULT_KEY_FIELD";
    pub const VAULT_CHAIN_FIELD: &str = "VAULT_CHAIN_FIELD";
    pub const VAULT_ROLE: &str = "VAULT_ROLE";
    pub const VAULT_AUTH_METHOD: &str = "VAULT_AUTH_METHOD";
    /// Static session token; when set the login exchange is skipped
    pub const VAULT_TOKEN: &str = "VAULT_TOKEN";
    /// Path to the service-account JWT used for the login exchange
    pub const KUBE_TOKEN: &str = "KUBE_TOKEN";
    /// PEM file with CA certificates to trust for the Vault server
    pub const VAULT_CACERT: &str = "VAULT_CACERT";
    /// Directory of PEM CA certificates to trust for the Vault server
    pub const VAULT_CAPATH: &str = "VAULT_CAPATH";
    pub const VAULT_SKIP_VERIFY: &str = "VAULT_SKIP_VERIFY";
    pub const VAULT_NAMESPACE: &str = "VAULT_NAMESPACE";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

/// Vault connection defaults
pub mod vault {
    pub const DEFAULT_ADDR: &str = "https://127.0.0.1:8200";
    pub const DEFAULT_AUTH_METHOD: &str = "kubernetes";
    pub const TOKEN_HEADER: &str = "X-Vault-Token";
    pub const NAMESPACE_HEADER: &str = "X-Vault-Namespace";
}

/// Unix permissions applied to created directories and files
pub mod modes {
    pub const DIR: u32 = 0o755;
    pub const FILE: u32 = 0o644;
}

/// Name reported in the HTTP user agent
pub const APP_NAME: &str = "vault-cert-sync";
