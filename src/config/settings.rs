//! TOML-based configuration for metastep.
//!
//! Supports a config file (metastep.toml) with variable expansion.
//!
//! Example configuration:
//! ```toml
//! [variables]
//! DATA_DIR = "./data"
//!
//! [connections.warehouse]
//! driver = "sqlite"
//! url = "sqlite:${DATA_DIR}/warehouse.db"
//!
//! [connections.staging]
//! driver = "sqlite"
//! url = "sqlite:${STAGING_DB}"
//! user = "etl"
//! password = "${STAGING_PASSWORD}"
//!
//! [step]
//! operation = "getColumns"
//! arguments = ["", "", "orders", "%"]
//!
//! [step.connection]
//! source = "Connection"
//! name = "warehouse"
//!
//! [[step.output_fields]]
//! name = "COLUMN_NAME"
//! rename = "column"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::step::StepConfig;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named database connections.
    pub connections: HashMap<String, ConnectionSettings>,

    /// The metadata step.
    pub step: StepConfig,

    /// Variables available to `${VAR}` expansion.
    pub variables: HashMap<String, String>,
}

/// Connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Driver identifier, as registered in the driver registry.
    pub driver: String,

    /// Connection URL (supports ${VAR} expansion).
    pub url: String,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl ConnectionSettings {
    /// Create settings for a driver and URL without credentials.
    pub fn new(driver: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            url: url.into(),
            user: None,
            password: None,
        }
    }

    /// Expand variables in the URL and credentials.
    pub fn resolve(&self, vars: &Variables) -> Result<ConnectionSettings, SettingsError> {
        Ok(ConnectionSettings {
            driver: self.driver.clone(),
            url: vars.substitute(&self.url)?,
            user: self.user.as_deref().map(|s| vars.substitute(s)).transpose()?,
            password: self
                .password
                .as_deref()
                .map(|s| vars.substitute(s))
                .transpose()?,
        })
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `METASTEP_CONFIG`
    /// 2. `./metastep.toml`
    /// 3. `~/.config/metastep/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("METASTEP_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("metastep.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("metastep").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Get a connection by name.
    pub fn get_connection(&self, name: &str) -> Result<&ConnectionSettings, SettingsError> {
        self.connections
            .get(name)
            .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string()))
    }

    /// Variables for expansion: the `[variables]` table over the process environment.
    pub fn variables(&self) -> Variables {
        Variables::new(self.variables.clone())
    }
}

/// Variable space used to expand configuration strings.
///
/// Explicit variables shadow process environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: HashMap<String, String>,
}

impl Variables {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .cloned()
            .or_else(|| env::var(name).ok())
    }

    /// Expand `${VAR}` and `$VAR` references.
    pub fn substitute(&self, s: &str) -> Result<String, SettingsError> {
        expand_with(s, |name| self.get(name))
    }

    /// Expand `${VAR}` references that resolve, leaving everything else as
    /// written.
    ///
    /// Used for values that may legitimately contain `$`, such as metadata
    /// patterns (`V$SESSION`) and passwords.
    pub fn substitute_known(&self, s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let tail = &rest[start + 2..];
            let Some(end) = tail.find('}') else {
                rest = &rest[start..];
                break;
            };
            match self.get(&tail[..end]) {
                Some(value) => result.push_str(&value),
                None => result.push_str(&rest[start..start + 2 + end + 1]),
            }
            rest = &tail[end + 1..];
        }
        result.push_str(rest);
        result
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    expand_with(s, |name| env::var(name).ok())
}

fn expand_with<F>(s: &str, lookup: F) -> Result<String, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value = lookup(&var_name).ok_or(SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
