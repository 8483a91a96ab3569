use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{IncomeType, NewIncomeRecord};

/// Largest `amount` or `federal_amount` a single record may carry.
///
/// One quadrillion: far beyond any real income, and low enough that a
/// ledger's totals stay inside the `Decimal` range for any record count a
/// store can hold.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Reasons an [`IncomeDraft`] is rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("`job_name` must not be blank")]
    BlankJobName,

    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("`{0}` must be a finite number")]
    NotFinite(&'static str),

    #[error("`{0}` is larger than the recordable maximum of {max}", max = MAX_AMOUNT)]
    OutOfRange(&'static str),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown income type '{0}', expected one of W2, 1099, Other")]
    UnknownIncomeType(String),

    /// The request body could not be decoded at all (bad JSON, a string
    /// where a number belongs, ...).
    #[error("malformed income entry: {0}")]
    Malformed(String),

    /// Rejected by a remote ledger; carries the server's message.
    #[error("{0}")]
    Rejected(String),
}

/// An income entry as submitted by a client, before validation.
///
/// Every field is optional so that a missing value surfaces as
/// [`ValidationError::MissingField`] instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub federal_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_type: Option<String>,
}

impl IncomeDraft {
    /// Draft with every field populated.
    pub fn new(
        job_name: impl Into<String>,
        amount: f64,
        federal_amount: f64,
        date: impl Into<String>,
        income_type: IncomeType,
    ) -> Self {
        Self {
            job_name: Some(job_name.into()),
            amount: Some(amount),
            federal_amount: Some(federal_amount),
            date: Some(date.into()),
            income_type: Some(income_type.as_str().to_string()),
        }
    }

    /// Check every field and produce a record ready to be stored.
    ///
    /// `federal_amount` defaults to zero when absent; all other fields are
    /// required. Withholding larger than the gross amount is accepted.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking fields in
    /// declaration order.
    pub fn validate(self) -> Result<NewIncomeRecord, ValidationError> {
        let job_name = self
            .job_name
            .ok_or(ValidationError::MissingField("job_name"))?;
        let job_name = job_name.trim();
        if job_name.is_empty() {
            return Err(ValidationError::BlankJobName);
        }

        let amount = self.amount.ok_or(ValidationError::MissingField("amount"))?;
        let amount = parse_money("amount", amount)?;
        let federal_amount = parse_money("federal_amount", self.federal_amount.unwrap_or(0.0))?;

        let date = self.date.ok_or(ValidationError::MissingField("date"))?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date.clone()))?;

        let income_type = self
            .income_type
            .ok_or(ValidationError::MissingField("income_type"))?;
        let income_type = IncomeType::parse(income_type.trim())
            .ok_or(ValidationError::UnknownIncomeType(income_type))?;

        Ok(NewIncomeRecord {
            job_name: job_name.to_string(),
            amount,
            federal_amount,
            date,
            income_type,
        })
    }
}

impl From<&NewIncomeRecord> for IncomeDraft {
    /// Wire form of an already validated record, as sent to a remote ledger.
    fn from(record: &NewIncomeRecord) -> Self {
        Self {
            job_name: Some(record.job_name.clone()),
            amount: record.amount.to_f64(),
            federal_amount: record.federal_amount.to_f64(),
            date: Some(record.date.format("%Y-%m-%d").to_string()),
            income_type: Some(record.income_type.as_str().to_string()),
        }
    }
}

fn parse_money(
    field: &'static str,
    value: f64,
) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    // -0.0 passes the sign check; store it as a plain zero
    if value == 0.0 {
        return Ok(Decimal::ZERO);
    }
    Decimal::try_from(value)
        .ok()
        .filter(|amount| *amount <= MAX_AMOUNT)
        .ok_or(ValidationError::OutOfRange(field))
}
