// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! On-disk state: change detection and writing of the chain and key files.

use crate::config::Config;
use crate::constants::modes;
use crate::error::{CertSyncError, Result};
use crate::sync::extract::CertBundle;
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, instrument, warn};

/// Returns true when either target file is absent, unreadable or differs from `bundle`
#[instrument(skip_all, fields(full_chain = %config.full_chain_file.display(), key = %config.key_file.display()))]
pub async fn files_changed(config: &Config, bundle: &CertBundle) -> bool {
    if !content_matches(&config.full_chain_file, &bundle.full_chain).await {
        info!("Full chain contents changed");
        return true;
    }
    if !content_matches(&config.key_file, &bundle.key).await {
        info!("Key contents changed");
        return true;
    }
    info!("No changes");
    false
}

async fn content_matches(path: &Path, expected: &[u8]) -> bool {
    debug!("Reading file: {}", path.display());
    match tokio::fs::read(path).await {
        Ok(current) => current == expected,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("File does not exist: {}", path.display());
            false
        }
        Err(e) => {
            warn!("Failed to read {}, treating as changed: {}", path.display(), e);
            false
        }
    }
}

/// Write the chain file, then the key file. Stops at the first failure.
#[instrument(skip_all, fields(full_chain = %config.full_chain_file.display(), key = %config.key_file.display()))]
pub async fn write_bundle(config: &Config, bundle: &CertBundle) -> Result<()> {
    ensure_parent_dir(&config.full_chain_file).await?;
    ensure_parent_dir(&config.key_file).await?;

    write_file(&config.full_chain_file, &bundle.full_chain).await?;
    write_file(&config.key_file, &bundle.key).await?;

    Ok(())
}

async fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::try_exists(parent).await.unwrap_or(false) {
        return Ok(());
    }

    info!("Creating dir: {}", parent.display());
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(modes::DIR);
    builder.create(parent).await.map_err(|source| {
        error!("Failed to create {}: {}", parent.display(), source);
        CertSyncError::WriteFailed {
            path: parent.to_path_buf(),
            source,
        }
    })
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    info!("Writing file: {}", path.display());
    let write = async {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(modes::FILE);
        let mut file = options.open(path).await?;
        file.write_all(contents).await?;
        file.flush().await
    };
    write.await.map_err(|source| {
        error!("Failed to write {}: {}", path.display(), source);
        CertSyncError::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}
