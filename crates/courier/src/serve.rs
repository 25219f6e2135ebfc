// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `courier serve` command implementation.
//!
//! Wires the full relay stack: SQLite storage, the OpenAI-compatible
//! completion gateway, the whatsapp-web bridge channel, the quota tracker,
//! and the dispatcher loop. Supports graceful shutdown via signal handlers.

use std::sync::Arc;

use courier_bot::quota::QuotaTracker;
use courier_bot::{Dispatcher, shutdown};
use courier_config::CourierConfig;
use courier_core::{ChannelAdapter, CourierError};
use courier_openai::OpenAiGateway;
use courier_storage::Database;
use courier_whatsapp::BridgeChannel;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Runs the `courier serve` command until a shutdown signal arrives.
pub async fn run_serve(config: CourierConfig) -> Result<(), CourierError> {
    init_tracing(&config.bot.log_level);
    info!("starting courier serve");

    let db_path = config
        .storage
        .database_path
        .clone()
        .ok_or_else(|| CourierError::Config("storage.database_path is not set".into()))?;
    let db = Database::open(&db_path).await?;

    if config.storage.destructive_resync {
        warn!("storage.destructive_resync is enabled: all persisted data will be dropped");
        db.reset().await?;
    }

    let gateway = Arc::new(OpenAiGateway::new(&config.gateway)?);

    let mut bridge = BridgeChannel::new(&config.bridge);
    bridge.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(bridge);

    let quota = Arc::new(QuotaTracker::new(config.quota.daily_limit));

    let dispatcher = Dispatcher::new(channel, gateway, db.clone(), quota, config);

    let cancel = shutdown::install_signal_handler();
    dispatcher.run(cancel).await?;

    db.close().await?;
    info!("courier stopped");
    Ok(())
}

/// Initializes the tracing subscriber from `RUST_LOG` or the configured level.
fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
