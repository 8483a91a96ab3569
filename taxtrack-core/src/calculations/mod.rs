//! Tax estimation: injectable policies and the ledger summary calculator.

pub mod choice;
pub mod common;
pub mod policy;
pub mod summary;

pub use choice::{PolicyChoice, PolicyChoiceError};
pub use policy::{BracketPolicy, FlatRatePolicy, NoTaxPolicy, PolicyError, TaxPolicy};
pub use summary::{SummaryError, TaxCalculator, income_by_type, summarize};
