mod income;
mod income_draft;
mod income_type;
mod tax_bracket;
mod tax_summary;

pub use income::{IncomeId, IncomeRecord, NewIncomeRecord};
pub use income_draft::{IncomeDraft, MAX_AMOUNT, ValidationError};
pub use income_type::IncomeType;
pub use tax_bracket::TaxBracket;
pub use tax_summary::TaxSummary;
