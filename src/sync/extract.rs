// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed decoding of certificate material from a secret mapping.

use crate::config::Config;
use crate::error::{CertSyncError, Result};
use crate::vault::SecretData;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::{Bytes, BytesMut};
use tracing::{debug, error, instrument};

/// Decoded contents of the two target files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertBundle {
    /// Certificate bytes followed directly by the chain bytes, if any
    pub full_chain: Bytes,
    pub key: Bytes,
}

/// Validate and decode the configured fields of `secret` into a [`CertBundle`]
#[instrument(skip(secret, config), fields(cert_field = ?config.cert_field, key_field = ?config.key_field, chain_field = ?config.chain_field))]
pub fn decode_bundle(secret: &SecretData, config: &Config) -> Result<CertBundle> {
    let cert_field = required_field_name(config.cert_field.as_deref(), "cert")?;
    let key_field = required_field_name(config.key_field.as_deref(), "key")?;

    let cert_b64 = string_value(secret, cert_field)?;
    let key_b64 = string_value(secret, key_field)?;
    let chain_b64 = config
        .chain_field
        .as_deref()
        .map(|field| string_value(secret, field).map(|v| (field, v)))
        .transpose()?;

    let cert = decode_field(cert_field, cert_b64)?;
    let key = decode_field(key_field, key_b64)?;

    let full_chain = match chain_b64 {
        Some((chain_field, value)) => {
            let chain = decode_field(chain_field, value)?;
            let mut joined = BytesMut::with_capacity(cert.len() + chain.len());
            joined.extend_from_slice(&cert);
            joined.extend_from_slice(&chain);
            joined.freeze()
        }
        None => Bytes::from(cert),
    };

    debug!(
        "Decoded bundle: {} chain bytes, {} key bytes",
        full_chain.len(),
        key.len()
    );

    Ok(CertBundle {
        full_chain,
        key: Bytes::from(key),
    })
}

fn required_field_name<'a>(name: Option<&'a str>, kind: &str) -> Result<&'a str> {
    name.filter(|n| !n.is_empty()).ok_or_else(|| {
        error!("No {} field configured", kind);
        CertSyncError::FieldMissing(format!("no {} field name configured", kind))
    })
}

fn string_value<'a>(secret: &'a SecretData, field: &str) -> Result<&'a str> {
    secret.get(field).and_then(|v| v.as_str()).ok_or_else(|| {
        error!("Field '{}' not found or not a string in secret", field);
        CertSyncError::FieldMissing(format!("field '{}' not found or not a string", field))
    })
}

fn decode_field(field: &str, value: &str) -> Result<Vec<u8>> {
    BASE64.decode(value).map_err(|source| {
        error!("Field '{}' is not valid base64: {}", field, source);
        CertSyncError::Decode {
            field: field.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{b64, make_config, secret_data};
    use std::path::Path;

    fn config_with_chain(chain: Option<&str>) -> Config {
        Config {
            chain_field: chain.map(str::to_string),
            ..make_config(Path::new("/tmp/unused"))
        }
    }

    #[test]
    fn test_decode_cert_and_key() {
        let secret = secret_data(&[("cert", b64("CERTDATA")), ("key", b64("KEYDATA"))]);

        let bundle = decode_bundle(&secret, &config_with_chain(None)).unwrap();

        assert_eq!(bundle.full_chain, Bytes::from_static(b"CERTDATA"));
        assert_eq!(bundle.key, Bytes::from_static(b"KEYDATA"));
    }

    #[test]
    fn test_chain_is_appended_without_separator() {
        let secret = secret_data(&[
            ("cert", b64("-----CERT-----")),
            ("key", b64("KEYDATA")),
            ("chain", b64("-----CHAIN-----\n")),
        ]);

        let bundle = decode_bundle(&secret, &config_with_chain(Some("chain"))).unwrap();

        assert_eq!(
            bundle.full_chain,
            Bytes::from_static(b"-----CERT----------CHAIN-----\n")
        );
    }

    #[test]
    fn test_chain_field_ignored_when_not_configured() {
        let secret = secret_data(&[
            ("cert", b64("CERTDATA")),
            ("key", b64("KEYDATA")),
            ("chain", b64("CHAINDATA")),
        ]);

        let bundle = decode_bundle(&secret, &config_with_chain(None)).unwrap();

        assert_eq!(bundle.full_chain, Bytes::from_static(b"CERTDATA"));
    }

    #[test]
    fn test_configured_chain_missing_is_field_missing() {
        let secret = secret_data(&[("cert", b64("CERTDATA")), ("key", b64("KEYDATA"))]);

        let err = decode_bundle(&secret, &config_with_chain(Some("chain"))).unwrap_err();

        assert!(matches!(err, CertSyncError::FieldMissing(msg) if msg.contains("chain")));
    }

    #[test]
    fn test_missing_cert_field_name_is_field_missing() {
        let secret = secret_data(&[("cert", b64("CERTDATA")), ("key", b64("KEYDATA"))]);
        let config = Config {
            cert_field: None,
            ..config_with_chain(None)
        };

        let err = decode_bundle(&secret, &config).unwrap_err();

        assert!(matches!(err, CertSyncError::FieldMissing(_)));
    }

    #[test]
    fn test_missing_key_value_is_field_missing() {
        let secret = secret_data(&[("cert", b64("CERTDATA"))]);

        let err = decode_bundle(&secret, &config_with_chain(None)).unwrap_err();

        assert!(matches!(err, CertSyncError::FieldMissing(msg) if msg.contains("'key'")));
    }

    #[test]
    fn test_non_string_value_is_field_missing() {
        let mut secret = secret_data(&[("key", b64("KEYDATA"))]);
        secret.insert("cert".to_string(), serde_json::json!(42));

        let err = decode_bundle(&secret, &config_with_chain(None)).unwrap_err();

        assert!(matches!(err, CertSyncError::FieldMissing(_)));
    }

    #[test]
    fn test_invalid_base64_is_decode_error() {
        let secret = secret_data(&[("cert", b64("CERTDATA")), ("key", "not*base64!".into())]);

        let err = decode_bundle(&secret, &config_with_chain(None)).unwrap_err();

        assert!(matches!(err, CertSyncError::Decode { field, .. } if field == "key"));
    }

    #[test]
    fn test_invalid_chain_base64_is_decode_error() {
        let secret = secret_data(&[
            ("cert", b64("CERTDATA")),
            ("key", b64("KEYDATA")),
            ("chain", "%%%".into()),
        ]);

        let err = decode_bundle(&secret, &config_with_chain(Some("chain"))).unwrap_err();

        assert!(matches!(err, CertSyncError::Decode { field, .. } if field == "chain"));
    }
}
