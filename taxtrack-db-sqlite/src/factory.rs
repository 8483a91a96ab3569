use async_trait::async_trait;
use taxtrack_core::ledger::{LedgerError, LedgerFactory, LedgerRegistry, LedgerStore, MemoryLedgerFactory};

use crate::ledger::SqliteLedger;

/// The `sqlite` backend.
///
/// The location is a file path (created if missing), `:memory:`, or a sqlx
/// `sqlite:` URL; only the URL form is recognizable on its own. Opening
/// runs pending migrations.
pub struct SqliteLedgerFactory;

#[async_trait]
impl LedgerFactory for SqliteLedgerFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn claims(
        &self,
        location: &str,
    ) -> bool {
        location.starts_with("sqlite:")
    }

    async fn open(
        &self,
        location: &str,
    ) -> Result<Box<dyn LedgerStore>, LedgerError> {
        let ledger = SqliteLedger::open(location)
            .await
            .map_err(|e| LedgerError::Connection(format!("{e:#}")))?;
        ledger
            .run_migrations()
            .await
            .map_err(|e| LedgerError::Database(format!("{e:#}")))?;
        Ok(Box::new(ledger))
    }
}

/// Registry of the backends that keep the ledger in this process:
/// `memory` and `sqlite`.
pub fn local_backends() -> LedgerRegistry {
    LedgerRegistry::new()
        .with(MemoryLedgerFactory)
        .with(SqliteLedgerFactory)
}
