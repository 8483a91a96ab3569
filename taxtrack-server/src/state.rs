//! Shared state handed to every request handler.

use std::sync::Arc;

use taxtrack_core::LedgerStore;
use taxtrack_core::calculations::TaxCalculator;

/// Cheap to clone: both members are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerStore>,
    pub calculator: TaxCalculator,
}

impl AppState {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        calculator: TaxCalculator,
    ) -> Self {
        Self { ledger, calculator }
    }
}
