//! Driver-specific error types.

use thiserror::Error;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors raised by drivers, connections and result sets.
#[derive(Error, Debug)]
pub enum DriverError {
    /// No driver is registered under the requested identifier.
    #[error("database driver not found: {0}")]
    DriverNotFound(String),

    /// The driver does not understand the connection URL.
    #[error("driver '{driver}' does not accept url '{url}'")]
    UnsupportedUrl {
        /// Driver identifier.
        driver: String,
        /// Rejected URL.
        url: String,
    },

    /// Database connection failed.
    #[error("database connection failed: {0}")]
    ConnectionFailed(String),

    /// The connection was used after being closed.
    #[error("connection is closed")]
    ConnectionClosed,

    /// The driver does not implement this metadata operation.
    #[error("operation not supported by driver: {0}")]
    Unsupported(&'static str),

    /// Column index outside of `1..=count`.
    #[error("column index {column} out of range (result set has {count} columns)")]
    ColumnOutOfRange {
        /// Requested 1-based column.
        column: usize,
        /// Number of columns in the result set.
        count: usize,
    },

    /// A value was read before `next()` or after the last row.
    #[error("result set is not positioned on a row")]
    NoCurrentRow,

    /// The result set was used after being closed.
    #[error("result set is closed")]
    ResultSetClosed,

    /// Error reported by SQLite.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl DriverError {
    /// Check if this error happened while establishing a connection.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::DriverNotFound(_) | Self::UnsupportedUrl { .. } | Self::ConnectionFailed(_)
        )
    }
}
