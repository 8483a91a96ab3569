pub mod backend;
pub mod memory;
pub mod store;

pub use backend::{LedgerConfig, LedgerFactory, LedgerRegistry};
pub use memory::{MemoryLedger, MemoryLedgerFactory};
pub use store::{LedgerError, LedgerStore};
