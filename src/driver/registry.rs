//! Driver lookup by identifier.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::error::{DriverError, DriverResult};
use super::sqlite::SqliteDriver;
use super::Connection;

/// A database driver able to open connections.
pub trait Driver: Send + Sync {
    /// Whether this driver understands the URL.
    fn accepts_url(&self, url: &str) -> bool;

    /// Open a new connection.
    fn connect(
        &self,
        url: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> DriverResult<Box<dyn Connection>>;
}

/// Registry of drivers keyed by identifier.
///
/// Loading a driver by identifier and opening a connection through it are
/// one step here: [`DriverRegistry::connect`].
#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in drivers (`sqlite`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("sqlite", Arc::new(SqliteDriver));
        registry
    }

    /// Register a driver, replacing any driver with the same identifier.
    pub fn register(&mut self, id: impl Into<String>, driver: Arc<dyn Driver>) {
        self.drivers.insert(id.into(), driver);
    }

    /// Look up a driver.
    pub fn driver(&self, id: &str) -> DriverResult<&Arc<dyn Driver>> {
        self.drivers
            .get(id)
            .ok_or_else(|| DriverError::DriverNotFound(id.to_string()))
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Load the driver `id` and open a connection to `url`.
    pub fn connect(
        &self,
        id: &str,
        url: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> DriverResult<Box<dyn Connection>> {
        let driver = self.driver(id)?;
        if !driver.accepts_url(url) {
            return Err(DriverError::UnsupportedUrl {
                driver: id.to_string(),
                url: url.to_string(),
            });
        }
        debug!(driver = id, url, "opening connection");
        driver.connect(url, user, password)
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.ids())
            .finish()
    }
}
