// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use vault_cert_sync::config::{Args, Config};
use vault_cert_sync::constants::env;
use vault_cert_sync::error::CertSyncError;
use vault_cert_sync::sync::{run_cycle, SyncOutcome};
use vault_cert_sync::vault::VaultClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let config = match Config::from_env(args) {
        Ok(c) => c,
        Err(e @ CertSyncError::ConfigInvalid(_)) => {
            error!("{}", e);
            Args::command().print_help()?;
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Configuration loaded: secret_path={}, vault_addr={}",
        config.secret_path, config.vault_addr
    );

    let provider = VaultClient::new(config.vault_addr.clone(), &config.client)?;

    match run_cycle(&provider, &config)
        .await
        .with_context(|| format!("Sync of {} failed", config.secret_path))?
    {
        SyncOutcome::Unchanged => info!("Certificate already up to date"),
        SyncOutcome::Updated { command_ran } => {
            info!("Certificate updated (post-sync command run: {})", command_ran)
        }
    }

    Ok(())
}

/// Log verbosity comes from LOG_LEVEL, defaulting to info
fn init_tracing() {
    let level = std::env::var(env::LOG_LEVEL)
        .map(|l| parse_log_level(&l))
        .unwrap_or(LevelFilter::INFO);
    let filter = EnvFilter::default().add_directive(level.into());
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => LevelFilter::WARN,
        "fatal" | "panic" => LevelFilter::ERROR,
        "" => LevelFilter::INFO,
        other => other.parse().unwrap_or(LevelFilter::INFO),
    }
}
