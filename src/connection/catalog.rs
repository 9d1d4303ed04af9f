//! Named connections provided by the host.

use std::collections::HashMap;

use tracing::debug;

use crate::config::{ConnectionSettings, Variables};
use crate::driver::{Connection, DriverRegistry};
use crate::error::{StepError, StepResult};

/// A database the host knows by name.
///
/// Mirrors a host database handle: look it up, `connect`, borrow its
/// `connection`, and `disconnect` at shutdown.
pub trait NamedDatabase: Send {
    fn name(&self) -> &str;

    fn connect(&mut self) -> StepResult<()>;

    /// The live connection, once connected.
    fn connection(&self) -> Option<&dyn Connection>;

    fn disconnect(&mut self) -> StepResult<()>;
}

/// The host's catalog of named connections.
pub trait ConnectionCatalog: Send + Sync {
    /// Look up a database by name. Each call returns a fresh, unconnected handle.
    fn find(&self, name: &str) -> Option<Box<dyn NamedDatabase>>;
}

/// Catalog backed by `[connections.<name>]` settings and a driver registry.
#[derive(Debug, Clone, Default)]
pub struct SettingsCatalog {
    connections: HashMap<String, ConnectionSettings>,
    drivers: DriverRegistry,
    variables: Variables,
}

impl SettingsCatalog {
    pub fn new(
        connections: HashMap<String, ConnectionSettings>,
        drivers: DriverRegistry,
        variables: Variables,
    ) -> Self {
        Self {
            connections,
            drivers,
            variables,
        }
    }

    /// Add or replace a named connection.
    pub fn insert(&mut self, name: impl Into<String>, settings: ConnectionSettings) {
        self.connections.insert(name.into(), settings);
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl ConnectionCatalog for SettingsCatalog {
    fn find(&self, name: &str) -> Option<Box<dyn NamedDatabase>> {
        let settings = self.connections.get(name)?;
        Some(Box::new(RegistryDatabase {
            name: name.to_string(),
            settings: settings.clone(),
            drivers: self.drivers.clone(),
            variables: self.variables.clone(),
            connection: None,
        }))
    }
}

/// A named database that connects through the driver registry.
struct RegistryDatabase {
    name: String,
    settings: ConnectionSettings,
    drivers: DriverRegistry,
    variables: Variables,
    connection: Option<Box<dyn Connection>>,
}

impl NamedDatabase for RegistryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> StepResult<()> {
        if self.connection.is_some() {
            return Ok(());
        }
        let resolved = self.settings.resolve(&self.variables)?;
        debug!(connection = %self.name, driver = %resolved.driver, "connecting named database");
        let conn = self.drivers.connect(
            &resolved.driver,
            &resolved.url,
            resolved.user.as_deref(),
            resolved.password.as_deref(),
        )?;
        self.connection = Some(conn);
        Ok(())
    }

    fn connection(&self) -> Option<&dyn Connection> {
        self.connection.as_deref()
    }

    fn disconnect(&mut self) -> StepResult<()> {
        match self.connection.take() {
            Some(mut conn) => conn.close().map_err(StepError::from),
            None => Ok(()),
        }
    }
}
