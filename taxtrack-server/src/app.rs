//! Startup wiring shared by the binary and the integration tests.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use taxtrack_core::LedgerConfig;
use taxtrack_core::calculations::TaxCalculator;
use taxtrack_db_sqlite::local_backends;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::Config;
use crate::routes;
use crate::state::AppState;

/// Open the configured ledger and pair it with the configured policy.
pub async fn build_state(config: &Config) -> Result<AppState> {
    open_state(&config.ledger_config(), TaxCalculator::new(config.policy.build())).await
}

/// Only the local backends are offered: the server is the process that
/// holds the ledger, so pointing it at another server over `http` would
/// just proxy.
pub async fn open_state(
    ledger_config: &LedgerConfig,
    calculator: TaxCalculator,
) -> Result<AppState> {
    debug!(backend = %ledger_config.backend, "opening ledger");
    let ledger = local_backends().open(ledger_config).await?;
    Ok(AppState::new(Arc::from(ledger), calculator))
}

/// Serve the application on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}
