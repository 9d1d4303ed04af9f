//! # metastep
//!
//! A row-stream stage that, for every input row, runs one database
//! metadata-introspection operation (list tables, columns, keys, ...) and
//! emits the result rows merged with the input row.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Host pipeline (pipeline)                 │
//! │            open → process per row → close                │
//! └─────────────────────────────────────────────────────────┘
//!                          │ rows
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                  MetadataStep (step)                     │
//! │  fields: first-row layout    binder: typed arguments     │
//! │  connection: resolver/cache  catalog: operation table    │
//! └─────────────────────────────────────────────────────────┘
//!                          │ Operation::invoke
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │          DatabaseMetadata / ResultSet (driver)           │
//! │                 built-in: SQLite (rusqlite)              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use metastep::prelude::*;
//!
//! let mut config = StepConfig::for_operation("getTables");
//! config.connection = ConnectionSource::Jdbc {
//!     driver: "sqlite".into(),
//!     url: "sqlite:./app.db".into(),
//!     user: String::new(),
//!     password: String::new(),
//! };
//! config.arguments = vec!["".into(), "".into(), "%".into(), "TABLE".into()];
//! config.output_fields = vec![OutputField::keep("TABLE_NAME")];
//!
//! let context = ConnectionContext::with_drivers(DriverRegistry::with_defaults());
//! let mut step = MetadataStep::new(config, context);
//! let (output, summary) = run_batch(&mut step, RowBatch::single_empty_row()).unwrap();
//! println!("{} tables", summary.rows_written);
//! # let _ = output;
//! ```

pub mod binder;
pub mod catalog;
pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod fields;
pub mod logging;
pub mod pipeline;
pub mod row;
pub mod step;

pub use error::{StepError, StepResult};

/// Commonly used types.
pub mod prelude {
    pub use crate::catalog::{Catalog, Operation};
    pub use crate::config::{ConnectionSource, OutputField, Settings, StepConfig};
    pub use crate::connection::{ConnectionContext, ConnectionResolver};
    pub use crate::driver::DriverRegistry;
    pub use crate::error::{StepError, StepResult};
    pub use crate::pipeline::{run_batch, run_step, RowBatch, RunSummary, VecSink, VecSource};
    pub use crate::row::{FieldMeta, Row, RowShape, Value, ValueType};
    pub use crate::step::MetadataStep;
}
