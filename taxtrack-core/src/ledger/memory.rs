use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use super::backend::LedgerFactory;
use super::store::{LedgerError, LedgerStore};
use crate::models::{IncomeId, IncomeRecord, NewIncomeRecord};

#[derive(Debug)]
struct Inner {
    // Last id handed out; only ever moves forward.
    last_id: IncomeId,
    records: Vec<IncomeRecord>,
}

/// Process-local ledger. Contents are lost when the value is dropped.
#[derive(Debug)]
pub struct MemoryLedger {
    inner: RwLock<Inner>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                last_id: 0,
                records: Vec::new(),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Database("memory ledger lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Database("memory ledger lock poisoned".to_string()))
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn insert(
        &self,
        record: NewIncomeRecord,
    ) -> Result<IncomeRecord, LedgerError> {
        let mut inner = self.write()?;
        inner.last_id += 1;
        let stored = record.into_record(inner.last_id);
        inner.records.push(stored.clone());
        debug!(id = stored.id, "income record stored in memory");
        Ok(stored)
    }

    async fn remove(
        &self,
        id: IncomeId,
    ) -> Result<(), LedgerError> {
        let mut inner = self.write()?;
        let position = inner
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        // `remove` rather than `swap_remove` keeps insertion order
        inner.records.remove(position);
        debug!(id, "income record removed from memory");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<IncomeRecord>, LedgerError> {
        Ok(self.read()?.records.clone())
    }
}

/// The `memory` backend. The location is ignored and every open starts an
/// empty ledger.
pub struct MemoryLedgerFactory;

#[async_trait]
impl LedgerFactory for MemoryLedgerFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn open(
        &self,
        _location: &str,
    ) -> Result<Box<dyn LedgerStore>, LedgerError> {
        Ok(Box::new(MemoryLedger::new()))
    }
}
