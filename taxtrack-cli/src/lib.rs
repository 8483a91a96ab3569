pub mod output;
pub mod remote;

use taxtrack_core::LedgerRegistry;

pub use remote::{RemoteLedger, RemoteLedgerFactory};

/// Every backend the command-line client can talk to: the local ones plus
/// `http` for a running server.
pub fn client_backends() -> LedgerRegistry {
    taxtrack_db_sqlite::local_backends().with(RemoteLedgerFactory)
}
