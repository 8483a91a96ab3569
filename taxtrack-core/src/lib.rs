pub mod calculations;
pub mod ledger;
pub mod models;

pub use ledger::{LedgerConfig, LedgerError, LedgerFactory, LedgerRegistry, LedgerStore};
pub use models::*;
