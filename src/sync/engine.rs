// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One fetch-compare-write-notify cycle.

use crate::config::Config;
use crate::error::Result;
use crate::sync::command::run_post_sync_command;
use crate::sync::extract::decode_bundle;
use crate::sync::files::{files_changed, write_bundle};
use crate::vault::{SecretPath, SecretProvider};
use tracing::{error, info, instrument};

/// What a successful cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// On-disk files already matched the secret
    Unchanged,
    /// Both files were rewritten
    Updated { command_ran: bool },
}

/// Run a single sync cycle against `provider`.
/// The first error ends the cycle; files already written are left in place.
#[instrument(skip_all, fields(secret = %config.secret_path))]
pub async fn run_cycle<P: SecretProvider>(provider: &P, config: &Config) -> Result<SyncOutcome> {
    info!("Starting sync");

    let path = SecretPath::parse(&config.secret_path).inspect_err(|e| error!("{}", e))?;

    let session = provider
        .authenticate(&config.auth)
        .await
        .inspect_err(|e| error!("Sync failed during authentication: {}", e))?;
    let secret = provider
        .fetch_secret(&session, &path)
        .await
        .inspect_err(|e| error!("Sync failed fetching {}: {}", path, e))?;

    let bundle = decode_bundle(&secret, config)?;

    if !files_changed(config, &bundle).await {
        info!("Files up to date, nothing to do");
        return Ok(SyncOutcome::Unchanged);
    }

    info!("Files changed");
    write_bundle(config, &bundle).await?;

    let command_ran = run_post_sync_command(config.sync_complete_command.as_deref()).await?;

    info!("Sync complete");
    Ok(SyncOutcome::Updated { command_ran })
}
