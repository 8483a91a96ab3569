use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use taxtrack_server::logging::init_logging;
use taxtrack_server::{Config, build_state, serve};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("ENV").ok().as_deref() != Some("prod") {
        dotenvy::dotenv().ok();
    }

    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;

    info!(
        backend = %config.backend,
        policy = %config.policy,
        "starting taxtrack server"
    );
    let state = build_state(&config).await?;

    let listener = TcpListener::bind(config.addr).await?;
    serve(listener, state, shutdown_signal()).await
}
