//! SQLite backend for the income ledger.

mod decimal;
mod factory;
mod ledger;

pub use factory::{SqliteLedgerFactory, local_backends};
pub use ledger::SqliteLedger;
