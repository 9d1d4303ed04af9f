//! Configuration module for metastep.
//!
//! Handles the stage configuration, named connections, and variable expansion.

mod settings;
mod step;

pub use settings::{expand_env_vars, ConnectionSettings, Settings, SettingsError, Variables};
pub use step::{
    ConnectionSource, ConnectionSourceMode, OutputField, StepConfig, DEFAULT_FEEDBACK_SIZE,
};
