//! Stage configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::settings::SettingsError;

/// Default number of input rows between progress messages.
pub const DEFAULT_FEEDBACK_SIZE: u64 = 50_000;

/// The four ways the stage can obtain a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionSourceMode {
    /// A named connection, resolved once.
    Connection,
    /// A named connection whose name is read from a row field.
    ConnectionField,
    /// A driver/url/user/password tuple from configuration.
    Jdbc,
    /// A driver/url/user/password tuple read from row fields.
    JdbcFields,
}

impl ConnectionSourceMode {
    pub const ALL: [ConnectionSourceMode; 4] = [
        ConnectionSourceMode::Connection,
        ConnectionSourceMode::ConnectionField,
        ConnectionSourceMode::Jdbc,
        ConnectionSourceMode::JdbcFields,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionSourceMode::Connection => "Connection",
            ConnectionSourceMode::ConnectionField => "ConnectionField",
            ConnectionSourceMode::Jdbc => "JDBC",
            ConnectionSourceMode::JdbcFields => "JDBCFields",
        }
    }
}

impl FromStr for ConnectionSourceMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| SettingsError::InvalidConfig(format!("unknown connection source: {}", s)))
    }
}

impl fmt::Display for ConnectionSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the connection comes from, with the values that mode needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source")]
pub enum ConnectionSource {
    #[serde(rename = "Connection")]
    Connection {
        #[serde(default)]
        name: String,
    },

    #[serde(rename = "ConnectionField")]
    ConnectionField { field: String },

    #[serde(rename = "JDBC")]
    Jdbc {
        driver: String,
        url: String,
        #[serde(default)]
        user: String,
        #[serde(default)]
        password: String,
    },

    #[serde(rename = "JDBCFields")]
    JdbcFields {
        driver_field: String,
        url_field: String,
        user_field: String,
        password_field: String,
    },
}

impl ConnectionSource {
    pub fn mode(&self) -> ConnectionSourceMode {
        match self {
            ConnectionSource::Connection { .. } => ConnectionSourceMode::Connection,
            ConnectionSource::ConnectionField { .. } => ConnectionSourceMode::ConnectionField,
            ConnectionSource::Jdbc { .. } => ConnectionSourceMode::Jdbc,
            ConnectionSource::JdbcFields { .. } => ConnectionSourceMode::JdbcFields,
        }
    }
}

impl Default for ConnectionSource {
    fn default() -> Self {
        ConnectionSource::Connection {
            name: String::new(),
        }
    }
}

/// One selected result column and the name it gets in the output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputField {
    /// Result column name, e.g. `TABLE_NAME`.
    pub name: String,
    /// Output field name; blank keeps `name`.
    #[serde(default)]
    pub rename: String,
}

impl OutputField {
    pub fn new(name: impl Into<String>, rename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rename: rename.into(),
        }
    }

    /// Keep the result column's own name.
    pub fn keep(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    pub fn output_name(&self) -> &str {
        if self.rename.trim().is_empty() {
            &self.name
        } else {
            &self.rename
        }
    }
}

/// Immutable configuration of one metadata stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    pub connection: ConnectionSource,

    /// Operation name, e.g. `getTables`.
    pub operation: String,

    /// One entry per operation argument: a constant, or a field name when
    /// `arguments_from_fields` is set.
    pub arguments: Vec<String>,

    pub arguments_from_fields: bool,

    /// Drop the fields consumed as arguments from the output row.
    pub remove_argument_fields: bool,

    /// Emit the input row once when the operation returns no rows.
    pub always_pass_input_row: bool,

    pub output_fields: Vec<OutputField>,

    /// Log progress every this many input rows; 0 disables.
    pub feedback_size: u64,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionSource::default(),
            operation: "getCatalogs".to_string(),
            arguments: Vec::new(),
            arguments_from_fields: false,
            remove_argument_fields: false,
            always_pass_input_row: false,
            output_fields: Vec::new(),
            feedback_size: DEFAULT_FEEDBACK_SIZE,
        }
    }
}

impl StepConfig {
    /// Configuration for an operation with the default connection source.
    pub fn for_operation(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Self::default()
        }
    }
}
