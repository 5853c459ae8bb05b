// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{CertSyncError, Result};
use tokio::process::Command;
use tracing::{error, info, instrument};

/// Run the post-sync command, if one is configured.
/// Returns whether a command was executed.
#[instrument(skip_all, fields(command = command.unwrap_or_default()))]
pub async fn run_post_sync_command(command: Option<&str>) -> Result<bool> {
    let mut parts = command.unwrap_or_default().split_whitespace();
    let Some(program) = parts.next() else {
        info!("No command to run");
        return Ok(false);
    };
    let args: Vec<&str> = parts.collect();

    info!("Running command: {}", program);
    let output = Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|e| {
            error!("Failed to execute {}: {}", program, e);
            CertSyncError::CommandFailed(format!("failed to execute '{}': {}", program, e))
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    info!("stdout: {}", stdout.trim_end());
    info!("stderr: {}", stderr.trim_end());

    if !output.status.success() {
        error!("Command {} exited with {}", program, output.status);
        return Err(CertSyncError::CommandFailed(format!(
            "'{}' exited with {}: {}",
            program,
            output.status,
            stderr.trim_end()
        )));
    }

    Ok(true)
}
