// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `brewline serve` command implementation.
//!
//! Wires the adapters together (storage, catalog cache, parser, Telegram
//! channel, ledger), starts the health endpoint, and runs the update loop:
//! each inbound update is dispatched in its own task, so one slow parse
//! never blocks other users.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use brewline_agent::Dispatcher;
use brewline_catalog::CatalogCache;
use brewline_config::BrewlineConfig;
use brewline_core::BrewlineError;
use brewline_core::traits::{ChannelAdapter, LedgerAdapter, ParserAdapter, StorageAdapter};
use brewline_ledger::SheetsLedger;
use brewline_parser::LlmOrderParser;
use brewline_storage::SqliteStorage;
use brewline_telegram::TelegramChannel;

use crate::health;

/// Runs the `brewline serve` command until ctrl-c.
pub async fn run_serve(config: BrewlineConfig) -> Result<(), BrewlineError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting brewline serve");

    // Storage first: everything else reads through it.
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = storage;

    let catalog = Arc::new(CatalogCache::new(storage.clone()));

    let parser: Arc<dyn ParserAdapter> =
        Arc::new(LlmOrderParser::new(&config.parser, catalog.clone())?);

    let ledger: Option<Arc<dyn LedgerAdapter>> = match (
        config.ledger.spreadsheet_id.as_deref(),
        config.ledger.api_token.as_deref(),
    ) {
        (Some(_), Some(_)) => Some(Arc::new(SheetsLedger::new(&config.ledger)?)),
        _ => {
            warn!("ledger not configured; confirmed orders will not be recorded externally");
            None
        }
    };

    let mut telegram = TelegramChannel::new(&config.telegram)?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let dispatcher = Arc::new(Dispatcher::new(
        storage.clone(),
        channel.clone(),
        parser,
        ledger,
        catalog,
        config.telegram.admin_ids.clone(),
        Duration::from_secs(config.parser.timeout_secs),
    ));

    // Health endpoint runs alongside the update loop.
    let health_handle = tokio::spawn(health::run_server(
        config.server.clone(),
        storage.clone(),
    ));

    info!(
        admins = config.telegram.admin_ids.len(),
        "brewline serving updates"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            update = channel.receive() => {
                match update {
                    Ok(update) => {
                        // Each update is an independent task; cross-user
                        // concurrency costs nothing extra.
                        let dispatcher = dispatcher.clone();
                        tokio::spawn(async move {
                            dispatcher.dispatch(update).await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "channel receive failed, stopping");
                        break;
                    }
                }
            }
        }
    }

    health_handle.abort();
    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "channel shutdown failed");
    }
    storage.close().await?;
    info!("brewline stopped");
    Ok(())
}

/// Initializes the tracing subscriber from the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("brewline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
