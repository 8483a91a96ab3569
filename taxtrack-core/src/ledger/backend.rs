//! Picking a ledger backend by name and opening it.
//!
//! Each backend ships a [`LedgerFactory`]. Binaries collect the ones they
//! support in a [`LedgerRegistry`] and open whatever the user configured:
//!
//! ```
//! use taxtrack_core::ledger::{LedgerConfig, LedgerRegistry, MemoryLedgerFactory};
//!
//! let registry = LedgerRegistry::new().with(MemoryLedgerFactory);
//! assert_eq!(registry.backends(), ["memory"]);
//!
//! // Hand this to `registry.open(..)` to get a store
//! let config = LedgerConfig::new("memory", "");
//! # let _ = config;
//! ```

use async_trait::async_trait;

use super::store::{LedgerError, LedgerStore};

/// Which backend holds the ledger, and where.
///
/// `location` means whatever the backend says it means: a SQLite file path
/// or `:memory:`, a server URL, or nothing at all for `memory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub backend: String,
    pub location: String,
}

impl LedgerConfig {
    pub fn new(
        backend: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            location: location.into(),
        }
    }
}

#[async_trait]
pub trait LedgerFactory: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// Whether `location` unambiguously belongs to this backend, like an
    /// `http://` URL. Lets [`LedgerRegistry::locate`] pick a backend from a
    /// location alone. Nothing is claimed by default.
    fn claims(
        &self,
        _location: &str,
    ) -> bool {
        false
    }

    /// Open the ledger at `location`, creating or migrating it as needed.
    async fn open(
        &self,
        location: &str,
    ) -> Result<Box<dyn LedgerStore>, LedgerError>;
}

/// The backends a binary can open, in the order they were added.
#[derive(Default)]
pub struct LedgerRegistry {
    factories: Vec<Box<dyn LedgerFactory>>,
}

impl LedgerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `factory`, dropping any earlier factory with the same backend
    /// name.
    pub fn with(
        mut self,
        factory: impl LedgerFactory + 'static,
    ) -> Self {
        let name = factory.backend_name();
        self.factories.retain(|f| f.backend_name() != name);
        self.factories.push(Box::new(factory));
        self
    }

    pub fn backends(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.backend_name()).collect()
    }

    fn unknown(
        &self,
        what: String,
    ) -> LedgerError {
        LedgerError::Configuration(format!(
            "{what}; known backends: {}",
            self.backends().join(", ")
        ))
    }

    /// Configuration for the first backend that claims `location`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Configuration`] when no backend claims it.
    pub fn locate(
        &self,
        location: &str,
    ) -> Result<LedgerConfig, LedgerError> {
        self.factories
            .iter()
            .find(|f| f.claims(location))
            .map(|f| LedgerConfig::new(f.backend_name(), location))
            .ok_or_else(|| self.unknown(format!("no backend recognizes '{location}'")))
    }

    /// Open the ledger `config` describes.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Configuration`] for an unknown backend name, otherwise
    /// whatever the backend's factory reports.
    pub async fn open(
        &self,
        config: &LedgerConfig,
    ) -> Result<Box<dyn LedgerStore>, LedgerError> {
        let factory = self
            .factories
            .iter()
            .find(|f| f.backend_name() == config.backend)
            .ok_or_else(|| self.unknown(format!("no backend named '{}'", config.backend)))?;
        factory.open(&config.location).await
    }
}
