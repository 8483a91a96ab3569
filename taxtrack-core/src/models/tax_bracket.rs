use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of a progressive tax schedule.
///
/// Income above `min_income` and up to `max_income` is taxed at `tax_rate`
/// on top of `base_tax`, the total owed on everything below the band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}
