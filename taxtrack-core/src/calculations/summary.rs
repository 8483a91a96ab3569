//! Tax summary derived from a ledger snapshot.
//!
//! Nothing here keeps state between calls: every summary is recomputed from
//! the records it is handed.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use super::policy::{BracketPolicy, TaxPolicy};
use crate::models::{IncomeRecord, IncomeType, TaxSummary};

/// A ledger whose figures do not fit in a [`Decimal`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("{0} exceeds the largest representable amount")]
    Overflow(&'static str),
}

fn checked_total<'a>(
    what: &'static str,
    amounts: impl IntoIterator<Item = &'a Decimal>,
) -> Result<Decimal, SummaryError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(*amount))
        .ok_or(SummaryError::Overflow(what))
}

/// Computes the tax summary of `records` under `policy`.
///
/// Totals are summed in a single pass with exact decimal arithmetic, so the
/// result does not depend on record order. `effective_rate` is `0` whenever
/// the total income is zero.
///
/// # Errors
///
/// [`SummaryError::Overflow`] when a total, or the rate derived from a
/// policy's estimate, leaves the `Decimal` range.
pub fn summarize(
    records: &[IncomeRecord],
    policy: &dyn TaxPolicy,
) -> Result<TaxSummary, SummaryError> {
    let total_income = checked_total("total income", records.iter().map(|r| &r.amount))?;
    let paid_tax = checked_total("total withholding", records.iter().map(|r| &r.federal_amount))?;

    let estimated_tax = policy.estimate(total_income);
    let effective_rate = if total_income > Decimal::ZERO {
        estimated_tax
            .checked_div(total_income)
            .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or(SummaryError::Overflow("effective rate"))?
    } else {
        Decimal::ZERO
    };

    Ok(TaxSummary {
        total_income,
        estimated_tax,
        paid_tax,
        effective_rate,
    })
}

/// Gross income per [`IncomeType`], for grouped display. Types with no
/// records are absent.
///
/// # Errors
///
/// [`SummaryError::Overflow`] when one type's total leaves the `Decimal`
/// range.
pub fn income_by_type(
    records: &[IncomeRecord],
) -> Result<BTreeMap<IncomeType, Decimal>, SummaryError> {
    let mut totals = BTreeMap::new();
    for record in records {
        let total = totals.entry(record.income_type).or_insert(Decimal::ZERO);
        *total = total
            .checked_add(record.amount)
            .ok_or(SummaryError::Overflow("income per type"))?;
    }
    Ok(totals)
}

/// Summary calculator holding the injected policy.
#[derive(Clone)]
pub struct TaxCalculator {
    policy: Arc<dyn TaxPolicy>,
}

impl TaxCalculator {
    pub fn new(policy: Arc<dyn TaxPolicy>) -> Self {
        Self { policy }
    }

    pub fn summarize(
        &self,
        records: &[IncomeRecord],
    ) -> Result<TaxSummary, SummaryError> {
        summarize(records, self.policy.as_ref())
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new(Arc::new(BracketPolicy::single_filer_2024()))
    }
}
