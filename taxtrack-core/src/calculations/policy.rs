//! Policies mapping total income to an estimated tax liability.
//!
//! The summary calculator only sees the [`TaxPolicy`] trait, so any pure
//! function can be injected. Three policies ship with the crate:
//!
//! | Policy            | Rule                                                     |
//! |-------------------|----------------------------------------------------------|
//! | [`BracketPolicy`] | standard deduction, then a progressive bracket schedule  |
//! | [`FlatRatePolicy`]| one rate over the whole income                           |
//! | [`NoTaxPolicy`]   | always zero                                              |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxtrack_core::calculations::{BracketPolicy, TaxPolicy};
//!
//! let policy = BracketPolicy::single_filer_2024();
//!
//! // 100,000 - 14,600 deduction = 85,400 taxable, in the 22% band
//! assert_eq!(policy.estimate(dec!(100000)), dec!(13841.00));
//! assert_eq!(policy.estimate(dec!(0)), dec!(0));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::TaxBracket;
use crate::calculations::common::{non_negative, round_cents};

/// A pure rule computing the tax owed on `total_income`.
///
/// Implementations must be deterministic and must not fail: any schedule
/// checking belongs in the constructor.
pub trait TaxPolicy: Send + Sync {
    fn estimate(
        &self,
        total_income: Decimal,
    ) -> Decimal;
}

impl<F> TaxPolicy for F
where
    F: Fn(Decimal) -> Decimal + Send + Sync,
{
    fn estimate(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        self(total_income)
    }
}

/// Errors raised while building a policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    #[error("first bracket must start at 0, starts at {0}")]
    FirstBracketNotAtZero(Decimal),

    #[error("bracket starting at {0} is empty or inverted")]
    EmptyBracket(Decimal),

    #[error("gap or overlap between brackets at {0}")]
    Discontinuous(Decimal),

    #[error("only the last bracket may be open-ended")]
    OpenEndedBeforeLast,

    #[error("last bracket must be open-ended")]
    ClosedSchedule,

    #[error("tax rate {0} is outside 0..=1")]
    InvalidRate(Decimal),

    #[error("standard deduction {0} is negative")]
    NegativeDeduction(Decimal),
}

/// Progressive schedule applied after a standard deduction.
///
/// `estimate` subtracts the deduction (never going below zero), finds the
/// bracket holding the taxable income and returns
/// `base_tax + (taxable - min_income) * tax_rate`, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPolicy {
    standard_deduction: Decimal,
    brackets: Vec<TaxBracket>,
}

impl BracketPolicy {
    /// Builds a policy from an explicit schedule.
    ///
    /// Brackets must be sorted, start at zero, be contiguous and end with a
    /// single open-ended bracket.
    ///
    /// # Errors
    ///
    /// Returns the first [`PolicyError`] found in the schedule.
    pub fn new(
        standard_deduction: Decimal,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, PolicyError> {
        if standard_deduction < Decimal::ZERO {
            return Err(PolicyError::NegativeDeduction(standard_deduction));
        }
        let first = brackets.first().ok_or(PolicyError::NoTaxBrackets)?;
        if !first.min_income.is_zero() {
            return Err(PolicyError::FirstBracketNotAtZero(first.min_income));
        }

        for (i, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(PolicyError::InvalidRate(bracket.tax_rate));
            }
            let is_last = i + 1 == brackets.len();
            match (bracket.max_income, is_last) {
                (None, true) => {}
                (None, false) => return Err(PolicyError::OpenEndedBeforeLast),
                (Some(_), true) => return Err(PolicyError::ClosedSchedule),
                (Some(max), false) => {
                    if max <= bracket.min_income {
                        return Err(PolicyError::EmptyBracket(bracket.min_income));
                    }
                    if brackets[i + 1].min_income != max {
                        return Err(PolicyError::Discontinuous(max));
                    }
                }
            }
        }

        Ok(Self {
            standard_deduction,
            brackets,
        })
    }

    /// Builds a schedule from `(upper_limit, rate)` pairs, deriving each
    /// bracket's `base_tax` from the ones below it. The last pair must have
    /// no upper limit.
    ///
    /// # Errors
    ///
    /// Same as [`BracketPolicy::new`].
    pub fn from_rates(
        standard_deduction: Decimal,
        rates: &[(Option<Decimal>, Decimal)],
    ) -> Result<Self, PolicyError> {
        let mut brackets = Vec::with_capacity(rates.len());
        let mut min_income = Decimal::ZERO;
        let mut base_tax = Decimal::ZERO;

        for &(max_income, tax_rate) in rates {
            brackets.push(TaxBracket {
                min_income,
                max_income,
                tax_rate,
                base_tax,
            });
            if let Some(max) = max_income {
                base_tax += (max - min_income) * tax_rate;
                min_income = max;
            }
        }

        Self::new(standard_deduction, brackets)
    }

    /// 2024 US federal schedule for single filers, standard deduction
    /// included. This is the schedule the tracker uses unless configured
    /// otherwise.
    pub fn single_filer_2024() -> Self {
        let rates = [
            (Some(dec!(11600)), dec!(0.10)),
            (Some(dec!(47150)), dec!(0.12)),
            (Some(dec!(100525)), dec!(0.22)),
            (Some(dec!(191950)), dec!(0.24)),
            (Some(dec!(243725)), dec!(0.32)),
            (Some(dec!(609350)), dec!(0.35)),
            (None, dec!(0.37)),
        ];
        match Self::from_rates(dec!(14600), &rates) {
            Ok(policy) => policy,
            Err(e) => unreachable!("built-in 2024 schedule is valid: {e}"),
        }
    }

    pub fn standard_deduction(&self) -> Decimal {
        self.standard_deduction
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    fn bracket_for(
        &self,
        taxable_income: Decimal,
    ) -> &TaxBracket {
        // The schedule is contiguous and open-ended, so the scan always hits
        self.brackets
            .iter()
            .find(|b| {
                taxable_income > b.min_income
                    && b.max_income.is_none_or(|max| taxable_income <= max)
            })
            .unwrap_or(&self.brackets[self.brackets.len() - 1])
    }
}

impl TaxPolicy for BracketPolicy {
    fn estimate(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        let taxable_income = non_negative(total_income - self.standard_deduction);
        if taxable_income.is_zero() {
            return Decimal::ZERO;
        }

        let bracket = self.bracket_for(taxable_income);
        let marginal_income = taxable_income - bracket.min_income;
        round_cents(bracket.base_tax + marginal_income * bracket.tax_rate)
    }
}

/// A single rate over the whole income, no deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRatePolicy {
    rate: Decimal,
}

impl FlatRatePolicy {
    /// # Errors
    ///
    /// [`PolicyError::InvalidRate`] when `rate` is outside `0..=1`.
    pub fn new(rate: Decimal) -> Result<Self, PolicyError> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(PolicyError::InvalidRate(rate));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

impl TaxPolicy for FlatRatePolicy {
    fn estimate(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        round_cents(non_negative(total_income) * self.rate)
    }
}

/// Estimates no tax at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoTaxPolicy;

impl TaxPolicy for NoTaxPolicy {
    fn estimate(
        &self,
        _total_income: Decimal,
    ) -> Decimal {
        Decimal::ZERO
    }
}
