// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertSyncError {
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Secret store error: {0}")]
    Provider(String),

    #[error("Invalid secret path '{0}': expected <mount>/<path/to/secret>")]
    InvalidPath(String),

    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    #[error("Field missing: {0}")]
    FieldMissing(String),

    #[error("Failed to base64-decode field '{field}': {source}")]
    Decode {
        field: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Failed to write {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Post-sync command failed: {0}")]
    CommandFailed(String),
}

impl From<reqwest::Error> for CertSyncError {
    fn from(e: reqwest::Error) -> Self {
        CertSyncError::Provider(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CertSyncError>;
