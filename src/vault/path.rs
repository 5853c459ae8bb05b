// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{CertSyncError, Result};
use std::fmt;

/// A `<mount>/<path>` reference to a KV v2 secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPath {
    mount: String,
    path: String,
}

impl SecretPath {
    /// Split on the first `/`. Both the mount and the remainder must be non-empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim_matches('/');
        match trimmed.split_once('/') {
            Some((mount, path)) if !mount.is_empty() && !path.trim_matches('/').is_empty() => {
                Ok(SecretPath {
                    mount: mount.to_string(),
                    path: path.trim_matches('/').to_string(),
                })
            }
            _ => Err(CertSyncError::InvalidPath(raw.to_string())),
        }
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// API path of the KV v2 read endpoint, relative to `/v1/`
    pub fn data_path(&self) -> String {
        format!("{}/data/{}", self.mount, self.path)
    }
}

impl fmt::Display for SecretPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mount, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mount_and_path() {
        let path = SecretPath::parse("kv/certs/example.com").unwrap();
        assert_eq!(path.mount(), "kv");
        assert_eq!(path.path(), "certs/example.com");
        assert_eq!(path.data_path(), "kv/data/certs/example.com");
        assert_eq!(path.to_string(), "kv/certs/example.com");
    }

    #[test]
    fn test_parse_two_segments() {
        let path = SecretPath::parse("secret/tls").unwrap();
        assert_eq!(path.data_path(), "secret/data/tls");
    }

    #[test]
    fn test_parse_strips_surrounding_slashes() {
        let path = SecretPath::parse("/kv/certs/example.com/").unwrap();
        assert_eq!(path.data_path(), "kv/data/certs/example.com");
    }

    #[test]
    fn test_parse_without_separator_is_invalid() {
        let err = SecretPath::parse("badpath").unwrap_err();
        assert!(matches!(err, CertSyncError::InvalidPath(p) if p == "badpath"));
    }

    #[test]
    fn test_parse_empty_remainder_is_invalid() {
        assert!(matches!(
            SecretPath::parse("kv/"),
            Err(CertSyncError::InvalidPath(_))
        ));
        assert!(matches!(
            SecretPath::parse(""),
            Err(CertSyncError::InvalidPath(_))
        ));
    }
}
