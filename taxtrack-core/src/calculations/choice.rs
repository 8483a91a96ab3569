//! Named policies, as accepted on command lines and in the environment.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use super::policy::{BracketPolicy, FlatRatePolicy, NoTaxPolicy, PolicyError, TaxPolicy};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyChoiceError {
    #[error("unknown policy '{0}', expected brackets-2024, flat:<rate> or none")]
    Unknown(String),

    #[error("flat rate '{0}' is not a number")]
    NotANumber(String),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Which [`TaxPolicy`] a summary applies.
///
/// Parsed from `brackets-2024`, `flat:<rate>` or `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyChoice {
    Brackets2024,
    Flat(FlatRatePolicy),
    NoTax,
}

impl PolicyChoice {
    pub fn build(&self) -> Arc<dyn TaxPolicy> {
        match self {
            Self::Brackets2024 => Arc::new(BracketPolicy::single_filer_2024()),
            Self::Flat(policy) => Arc::new(*policy),
            Self::NoTax => Arc::new(NoTaxPolicy),
        }
    }
}

impl FromStr for PolicyChoice {
    type Err = PolicyChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "brackets-2024" => Ok(Self::Brackets2024),
            "none" => Ok(Self::NoTax),
            other => {
                let rate = other
                    .strip_prefix("flat:")
                    .ok_or_else(|| PolicyChoiceError::Unknown(other.to_string()))?
                    .trim();
                let rate = Decimal::from_str(rate)
                    .map_err(|_| PolicyChoiceError::NotANumber(rate.to_string()))?;
                Ok(Self::Flat(FlatRatePolicy::new(rate)?))
            }
        }
    }
}

impl fmt::Display for PolicyChoice {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Brackets2024 => f.write_str("brackets-2024"),
            Self::Flat(policy) => write!(f, "flat:{}", policy.rate()),
            Self::NoTax => f.write_str("none"),
        }
    }
}
