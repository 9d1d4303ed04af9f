//! Errors raised by the metadata stage.

use thiserror::Error;

use crate::config::SettingsError;
use crate::driver::DriverError;
use crate::row::ValueType;

/// Result type for stage operations.
pub type StepResult<T> = Result<T, StepError>;

/// The stage's standard error.
///
/// Every variant is fatal for the stream except where the caller chooses
/// otherwise; cleanup failures are logged, never returned.
#[derive(Debug, Error)]
pub enum StepError {
    // Configuration
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Operation {operation} takes {expected} arguments, {actual} configured")]
    ArgumentCountMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Operation {operation} has no output column named {column}")]
    UnknownOutputColumn {
        operation: &'static str,
        column: String,
    },

    #[error("Connection fields not found in input row: {}", .0.join(", "))]
    ConnectionFieldsNotFound(Vec<String>),

    #[error("Field {field} for argument {argument} not found in input row")]
    ArgumentFieldNotFound {
        argument: &'static str,
        field: String,
    },

    #[error("Argument {argument} cannot be read from a {kind} value")]
    UnsupportedArgumentType {
        argument: &'static str,
        kind: &'static str,
    },

    #[error("Cannot convert {value:?} to {expected} for argument {argument}")]
    TypeConversion {
        argument: &'static str,
        value: String,
        expected: String,
    },

    // Connection
    #[error("Named connection {0} not found")]
    ConnectionNotFound(String),

    #[error("Database {0} returned no connection")]
    NullConnection(String),

    #[error("Connection {what} field {field} is null")]
    MissingConnectionValue { what: &'static str, field: String },

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    // Invocation
    #[error("Invoking {operation} failed: {source}")]
    Invocation {
        operation: &'static str,
        #[source]
        source: DriverError,
    },

    #[error("Argument {argument} of {operation} must not be null")]
    NullArgument {
        operation: &'static str,
        argument: &'static str,
    },

    #[error("Cannot read result column {column} as {expected}: {value:?}")]
    ResultConversion {
        column: &'static str,
        value: String,
        expected: ValueType,
    },

    #[error("Input row has {actual} fields, expected {expected}")]
    RowWidthMismatch { expected: usize, actual: usize },

    // Lifecycle
    #[error("Step is not open")]
    NotOpen,
}

impl StepError {
    /// Whether this error stems from the stage configuration rather than the
    /// database or the data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StepError::UnknownOperation(_)
                | StepError::ArgumentCountMismatch { .. }
                | StepError::UnknownOutputColumn { .. }
                | StepError::ConnectionFieldsNotFound(_)
                | StepError::ArgumentFieldNotFound { .. }
                | StepError::UnsupportedArgumentType { .. }
                | StepError::TypeConversion { .. }
                | StepError::Settings(_)
        )
    }
}
