use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate figures derived from a ledger snapshot. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_tax: Decimal,
    /// Percentage, `0` for an empty or zero-income ledger.
    #[serde(with = "rust_decimal::serde::float")]
    pub effective_rate: Decimal,
}
