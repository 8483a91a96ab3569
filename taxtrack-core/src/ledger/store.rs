use async_trait::async_trait;
use thiserror::Error;

use crate::calculations::{SummaryError, TaxCalculator};
use crate::models::{
    IncomeDraft, IncomeId, IncomeRecord, NewIncomeRecord, TaxSummary, ValidationError,
};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("invalid income entry: {0}")]
    Validation(#[from] ValidationError),

    #[error("income record {0} not found")]
    NotFound(IncomeId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    /// The remote ledger could not be reached or answered unexpectedly.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("cannot summarize ledger: {0}")]
    Summary(#[from] SummaryError),
}

/// Holder of the income record set.
///
/// Implementations must make each call atomic: `list` never observes a
/// half-applied `insert` or `remove`, and ids handed out by `insert` are
/// never issued again, even after the record is removed.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Store an already validated record and return it with its new id.
    async fn insert(
        &self,
        record: NewIncomeRecord,
    ) -> Result<IncomeRecord, LedgerError>;

    /// Delete the record with `id`.
    ///
    /// Returns [`LedgerError::NotFound`] and leaves the ledger untouched when
    /// no such record exists.
    async fn remove(
        &self,
        id: IncomeId,
    ) -> Result<(), LedgerError>;

    /// Every current record, in insertion order.
    async fn list(&self) -> Result<Vec<IncomeRecord>, LedgerError>;

    /// Validate `draft` and store it.
    ///
    /// A draft that fails validation never reaches [`LedgerStore::insert`].
    async fn add(
        &self,
        draft: IncomeDraft,
    ) -> Result<IncomeRecord, LedgerError> {
        let record = draft.validate()?;
        self.insert(record).await
    }

    /// Tax summary of the current records.
    ///
    /// Local stores summarize their own snapshot with `calculator`. A store
    /// fronting a remote ledger may return the remote side's summary
    /// instead, computed under that side's policy.
    async fn summarize(
        &self,
        calculator: &TaxCalculator,
    ) -> Result<TaxSummary, LedgerError> {
        let records = self.list().await?;
        Ok(calculator.summarize(&records)?)
    }
}
