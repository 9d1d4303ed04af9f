//! Connection resolution and caching.
//!
//! One resolver per stage instance, in one of four modes fixed by the
//! configured [`ConnectionSource`]:
//!
//! | Mode              | Resolved           | Cached by                       |
//! |-------------------|--------------------|---------------------------------|
//! | `Connection`      | once, at open      | (single connection)             |
//! | `ConnectionField` | per row, on miss   | connection name                 |
//! | `JDBC`            | once, at open      | (single connection)             |
//! | `JDBCFields`      | per row, on miss   | `(driver, url, user, password)` |
//!
//! Cached connections stay open until [`ConnectionResolver::close_all`]. The
//! caches are never evicted, so a stream with many distinct connection
//! parameters holds that many connections until the stage closes.

mod catalog;

pub use catalog::{ConnectionCatalog, NamedDatabase, SettingsCatalog};

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::{ConnectionSource, Variables};
use crate::driver::{Connection, DriverRegistry};
use crate::error::{StepError, StepResult};
use crate::fields::ConnectionFields;
use crate::row::Value;

/// Cache key for connections opened from row values.
///
/// Equality and hashing are structural over all four components.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct JdbcKey {
    pub driver: String,
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl JdbcKey {
    pub fn new(
        driver: impl Into<String>,
        url: impl Into<String>,
        user: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            driver: driver.into(),
            url: url.into(),
            user,
            password,
        }
    }
}

impl fmt::Debug for JdbcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JdbcKey")
            .field("driver", &self.driver)
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Shared services the resolver connects through.
#[derive(Clone)]
pub struct ConnectionContext {
    pub catalog: Arc<dyn ConnectionCatalog>,
    pub drivers: DriverRegistry,
    pub variables: Variables,
}

impl ConnectionContext {
    pub fn new(
        catalog: Arc<dyn ConnectionCatalog>,
        drivers: DriverRegistry,
        variables: Variables,
    ) -> Self {
        Self {
            catalog,
            drivers,
            variables,
        }
    }
}

impl fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("drivers", &self.drivers)
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}

enum State {
    Named(Option<Box<dyn NamedDatabase>>),
    NamedField(HashMap<String, Box<dyn NamedDatabase>>),
    Direct(Option<Box<dyn Connection>>),
    JdbcFields(HashMap<JdbcKey, Box<dyn Connection>>),
}

/// Resolves the connection to use for each row.
pub struct ConnectionResolver {
    source: ConnectionSource,
    context: ConnectionContext,
    state: State,
}

impl ConnectionResolver {
    pub fn new(source: ConnectionSource, context: ConnectionContext) -> Self {
        let state = match source {
            ConnectionSource::Connection { .. } => State::Named(None),
            ConnectionSource::ConnectionField { .. } => State::NamedField(HashMap::new()),
            ConnectionSource::Jdbc { .. } => State::Direct(None),
            ConnectionSource::JdbcFields { .. } => State::JdbcFields(HashMap::new()),
        };
        Self {
            source,
            context,
            state,
        }
    }

    pub fn source(&self) -> &ConnectionSource {
        &self.source
    }

    /// Establish the connection in advance for the fixed modes.
    ///
    /// Field-driven modes connect lazily, per row.
    pub fn open(&mut self) -> StepResult<()> {
        match (&self.source, &mut self.state) {
            (ConnectionSource::Connection { name }, State::Named(slot)) if slot.is_none() => {
                debug!(connection = %name, "connecting named connection in advance");
                *slot = Some(connect_named(self.context.catalog.as_ref(), name)?);
            }
            (
                ConnectionSource::Jdbc {
                    driver,
                    url,
                    user,
                    password,
                },
                State::Direct(slot),
            ) if slot.is_none() => {
                let vars = &self.context.variables;
                let key = JdbcKey::new(
                    vars.substitute_known(driver),
                    vars.substitute_known(url),
                    non_blank(vars.substitute_known(user)),
                    non_blank(vars.substitute_known(password)),
                );
                debug!(driver = %key.driver, url = %key.url, "connecting in advance");
                *slot = Some(connect_jdbc(&self.context.drivers, &key)?);
            }
            _ => {}
        }
        Ok(())
    }

    /// The connection for `row`, opening and caching it if needed.
    pub fn resolve(
        &mut self,
        fields: &ConnectionFields,
        row: &[Value],
    ) -> StepResult<&dyn Connection> {
        match (&mut self.state, fields) {
            (State::Named(slot), _) => {
                let db = slot.as_deref().ok_or(StepError::NotOpen)?;
                db.connection()
                    .ok_or_else(|| StepError::NullConnection(db.name().to_string()))
            }
            (State::Direct(slot), _) => slot.as_deref().ok_or(StepError::NotOpen),
            (State::NamedField(cache), ConnectionFields::Name(idx)) => {
                let name = match row.get(*idx) {
                    Some(Value::Null) | None => {
                        return Err(StepError::MissingConnectionValue {
                            what: "name",
                            field: field_name(&self.source, 0),
                        })
                    }
                    Some(value) => value.to_string(),
                };
                let db = match cache.entry(name) {
                    Entry::Occupied(entry) => {
                        trace!(connection = %entry.key(), "reusing cached named connection");
                        entry.into_mut()
                    }
                    Entry::Vacant(entry) => {
                        debug!(connection = %entry.key(), "opening named connection");
                        let db = connect_named(self.context.catalog.as_ref(), entry.key())?;
                        entry.insert(db)
                    }
                };
                db.connection()
                    .ok_or_else(|| StepError::NullConnection(db.name().to_string()))
            }
            (
                State::JdbcFields(cache),
                ConnectionFields::Jdbc {
                    driver,
                    url,
                    user,
                    password,
                },
            ) => {
                let required = |idx: usize, slot: usize, what: &'static str| {
                    match row.get(idx) {
                        Some(Value::Null) | None => Err(StepError::MissingConnectionValue {
                            what,
                            field: field_name(&self.source, slot),
                        }),
                        Some(value) => Ok(value.to_string()),
                    }
                };
                let optional = |idx: usize| match row.get(idx) {
                    Some(Value::Null) | None => None,
                    Some(value) => Some(value.to_string()),
                };
                let key = JdbcKey::new(
                    required(*driver, 0, "driver")?,
                    required(*url, 1, "url")?,
                    optional(*user),
                    optional(*password),
                );

                let conn = match cache.entry(key) {
                    Entry::Occupied(entry) => {
                        trace!(url = %entry.key().url, "reusing cached connection");
                        entry.into_mut()
                    }
                    Entry::Vacant(entry) => {
                        debug!(
                            driver = %entry.key().driver,
                            url = %entry.key().url,
                            "opening connection"
                        );
                        let conn = connect_jdbc(&self.context.drivers, entry.key())?;
                        entry.insert(conn)
                    }
                };
                Ok(&**conn)
            }
            (_, fields) => Err(StepError::ConnectionFieldsNotFound(vec![format!(
                "{} expects row fields, got {:?}",
                self.source.mode(),
                fields
            )])),
        }
    }

    /// Number of live connections held.
    pub fn cached_connections(&self) -> usize {
        match &self.state {
            State::Named(slot) => usize::from(slot.is_some()),
            State::Direct(slot) => usize::from(slot.is_some()),
            State::NamedField(cache) => cache.len(),
            State::JdbcFields(cache) => cache.len(),
        }
    }

    /// Close every held connection.
    ///
    /// Failures are logged and do not stop the remaining closes. Returns the
    /// number of connections that failed to close.
    pub fn close_all(&mut self) -> usize {
        let mut failures = 0;
        match &mut self.state {
            State::Named(slot) => {
                if let Some(mut db) = slot.take() {
                    failures += disconnect(db.as_mut());
                }
            }
            State::NamedField(cache) => {
                for (_, mut db) in cache.drain() {
                    failures += disconnect(db.as_mut());
                }
            }
            State::Direct(slot) => {
                if let Some(mut conn) = slot.take() {
                    failures += close(conn.as_mut(), "direct");
                }
            }
            State::JdbcFields(cache) => {
                for (key, mut conn) in cache.drain() {
                    failures += close(conn.as_mut(), &key.url);
                }
            }
        }
        failures
    }
}

impl fmt::Debug for ConnectionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionResolver")
            .field("mode", &self.source.mode())
            .field("connections", &self.cached_connections())
            .finish()
    }
}

fn connect_named(catalog: &dyn ConnectionCatalog, name: &str) -> StepResult<Box<dyn NamedDatabase>> {
    let mut db = catalog
        .find(name)
        .ok_or_else(|| StepError::ConnectionNotFound(name.to_string()))?;
    db.connect()?;
    if db.connection().is_none() {
        return Err(StepError::NullConnection(name.to_string()));
    }
    Ok(db)
}

fn connect_jdbc(drivers: &DriverRegistry, key: &JdbcKey) -> StepResult<Box<dyn Connection>> {
    let conn = drivers.connect(
        &key.driver,
        &key.url,
        key.user.as_deref(),
        key.password.as_deref(),
    )?;
    Ok(conn)
}

fn disconnect(db: &mut dyn NamedDatabase) -> usize {
    match db.disconnect() {
        Ok(()) => 0,
        Err(e) => {
            warn!(connection = %db.name(), error = %e, "failed to close connection");
            1
        }
    }
}

fn close(conn: &mut dyn Connection, label: &str) -> usize {
    match conn.close() {
        Ok(()) => 0,
        Err(e) => {
            warn!(connection = %label, error = %e, "failed to close connection");
            1
        }
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Configured field name for error messages; `slot` counts driver, url, user, password.
fn field_name(source: &ConnectionSource, slot: usize) -> String {
    match source {
        ConnectionSource::ConnectionField { field } => field.clone(),
        ConnectionSource::JdbcFields {
            driver_field,
            url_field,
            user_field,
            password_field,
        } => [driver_field, url_field, user_field, password_field][slot.min(3)].clone(),
        _ => String::new(),
    }
}
