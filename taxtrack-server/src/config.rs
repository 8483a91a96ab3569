//! Command-line and environment configuration for the server.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use taxtrack_core::LedgerConfig;
use taxtrack_core::calculations::PolicyChoice;

/// Income ledger and tax summary HTTP service.
///
/// Every option can also be set through the environment variable named in
/// its help text, or in a `.env` file in the working directory.
#[derive(Debug, Clone, Parser)]
#[command(version)]
pub struct Config {
    /// Ledger backend: `sqlite` or `memory`.
    #[arg(long, env = "TAXTRACK_BACKEND", default_value = "sqlite")]
    pub backend: String,

    /// Where the backend keeps the ledger.
    /// For SQLite this is a file path (e.g. `taxtrack.db`), a `sqlite:` URL
    /// or `:memory:`. The memory backend ignores it.
    #[arg(long, env = "TAXTRACK_DB", default_value = "taxtrack.db")]
    pub db: String,

    /// Address to listen on.
    #[arg(long, env = "TAXTRACK_ADDR", default_value = "0.0.0.0:5000")]
    pub addr: SocketAddr,

    /// Tax estimate policy: `brackets-2024`, `flat:<rate>` or `none`.
    #[arg(long, env = "TAXTRACK_POLICY", default_value = "brackets-2024")]
    pub policy: PolicyChoice,

    /// Also append log records to this file.
    #[arg(long, env = "TAXTRACK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig::new(&self.backend, &self.db)
    }
}
