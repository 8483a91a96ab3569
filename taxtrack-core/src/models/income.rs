use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::IncomeType;

/// Store-assigned identifier of an income record. Never reused.
pub type IncomeId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: IncomeId,
    pub job_name: String,

    // Gross income and federal tax already withheld against it
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub federal_amount: Decimal,

    pub date: NaiveDate,
    pub income_type: IncomeType,
}

/// A validated record that has not been stored yet (no id).
///
/// Only [`IncomeDraft::validate`](super::IncomeDraft::validate) produces
/// these, so every value carries the ledger invariants: non-blank job name,
/// finite non-negative amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncomeRecord {
    pub(crate) job_name: String,
    pub(crate) amount: Decimal,
    pub(crate) federal_amount: Decimal,
    pub(crate) date: NaiveDate,
    pub(crate) income_type: IncomeType,
}

impl NewIncomeRecord {
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn federal_amount(&self) -> Decimal {
        self.federal_amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn income_type(&self) -> IncomeType {
        self.income_type
    }

    /// Attach the id assigned by a store.
    pub fn into_record(
        self,
        id: IncomeId,
    ) -> IncomeRecord {
        IncomeRecord {
            id,
            job_name: self.job_name,
            amount: self.amount,
            federal_amount: self.federal_amount,
            date: self.date,
            income_type: self.income_type,
        }
    }
}
