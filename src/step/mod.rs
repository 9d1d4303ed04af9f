//! The metadata stage.
//!
//! Lifecycle, as driven by the host pipeline:
//!
//! ```text
//! open()      look up the operation, bind constant arguments,
//!             connect in advance for the fixed connection modes
//!    │
//! process()*  first row: resolve field layout
//!             every row: resolve connection, bind arguments, invoke,
//!                        emit 0..n output rows
//!    │
//! close()     close every cached connection
//! ```

mod assemble;

pub use assemble::coerce;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, trace};

use crate::binder::BoundArguments;
use crate::catalog::{Catalog, OperationDescriptor};
use crate::config::{Settings, StepConfig};
use crate::connection::{
    ConnectionCatalog, ConnectionContext, ConnectionResolver, SettingsCatalog,
};
use crate::driver::DriverRegistry;
use crate::error::{StepError, StepResult};
use crate::fields::{self, Layout};
use crate::pipeline::{RowSink, RowSource};
use crate::row::{Row, RowShape};

use assemble::{emit_rows, Cursor};

impl ConnectionContext {
    /// Context with the settings' named connections and variables.
    pub fn from_settings(settings: &Settings, drivers: DriverRegistry) -> Self {
        let variables = settings.variables();
        let catalog = SettingsCatalog::new(
            settings.connections.clone(),
            drivers.clone(),
            variables.clone(),
        );
        Self::new(Arc::new(catalog), drivers, variables)
    }

    /// Context without named connections.
    pub fn with_drivers(drivers: DriverRegistry) -> Self {
        let catalog: Arc<dyn ConnectionCatalog> = Arc::new(SettingsCatalog::new(
            HashMap::new(),
            drivers.clone(),
            Default::default(),
        ));
        Self::new(catalog, drivers, Default::default())
    }
}

/// State held between `open` and `close`.
struct Running {
    operation: &'static OperationDescriptor,
    /// Arguments bound at open when they are constants.
    constants: Option<BoundArguments>,
    resolver: ConnectionResolver,
    /// Computed on the first row.
    layout: Option<Layout>,
    rows_read: u64,
    rows_written: u64,
}

/// A stage instance. Single-threaded; each parallel copy owns its own.
pub struct MetadataStep {
    config: StepConfig,
    context: ConnectionContext,
    running: Option<Running>,
}

impl MetadataStep {
    pub fn new(config: StepConfig, context: ConnectionContext) -> Self {
        Self {
            config,
            context,
            running: None,
        }
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.running.is_some()
    }

    /// Set the stage up, returning the first error.
    pub fn try_open(&mut self) -> StepResult<()> {
        if self.running.is_some() {
            return Ok(());
        }

        debug!(operation = %self.config.operation, "setting up operation");
        let operation = Catalog::lookup(&self.config.operation)?;
        if operation.arguments.len() != self.config.arguments.len() {
            return Err(StepError::ArgumentCountMismatch {
                operation: operation.name,
                expected: operation.arguments.len(),
                actual: self.config.arguments.len(),
            });
        }
        fields::select_columns(&self.config, operation)?;

        let constants = if self.config.arguments_from_fields {
            None
        } else {
            let vars = &self.context.variables;
            let substituted: Vec<String> = self
                .config
                .arguments
                .iter()
                .map(|arg| vars.substitute_known(arg))
                .collect();
            let bound = BoundArguments::from_constants(operation, &substituted)?;
            debug!(arguments = %bound, "bound constant arguments");
            Some(bound)
        };

        debug!(source = %self.config.connection.mode(), "establishing connection");
        let mut resolver = ConnectionResolver::new(self.config.connection.clone(), self.context.clone());
        if let Err(e) = resolver.open() {
            resolver.close_all();
            return Err(e);
        }

        self.running = Some(Running {
            operation,
            constants,
            resolver,
            layout: None,
            rows_read: 0,
            rows_written: 0,
        });
        Ok(())
    }

    /// Set the stage up. `false` means the run must not start.
    pub fn open(&mut self) -> bool {
        match self.try_open() {
            Ok(()) => true,
            Err(e) => {
                error!(operation = %self.config.operation, error = %e, "failed to open metadata step");
                false
            }
        }
    }

    /// Process one input row. Returns `false` once the input is exhausted.
    pub fn process(
        &mut self,
        source: &mut dyn RowSource,
        sink: &mut dyn RowSink,
    ) -> StepResult<bool> {
        let Some(row) = source.get_row()? else {
            sink.finish()?;
            return Ok(false);
        };
        self.process_row(source.shape(), &row, sink)?;
        Ok(true)
    }

    /// Process one row of the given shape, writing its output rows to `sink`.
    /// Returns the number of output rows.
    pub fn process_row(
        &mut self,
        shape: &RowShape,
        row: &Row,
        sink: &mut dyn RowSink,
    ) -> StepResult<usize> {
        let config = &self.config;
        let running = self.running.as_mut().ok_or(StepError::NotOpen)?;

        if running.layout.is_none() {
            running.layout = Some(fields::resolve(config, running.operation, shape)?);
        }
        let Some(layout) = running.layout.as_ref() else {
            return Err(StepError::NotOpen);
        };
        if row.len() != layout.input_width {
            return Err(StepError::RowWidthMismatch {
                expected: layout.input_width,
                actual: row.len(),
            });
        }

        running.rows_read += 1;
        if config.feedback_size > 0 && running.rows_read % config.feedback_size == 0 {
            info!(rows = running.rows_read, "rows read");
        }

        let row_arguments;
        let arguments = match &running.constants {
            Some(bound) => bound,
            None => {
                row_arguments =
                    BoundArguments::from_row(running.operation, &layout.arguments, row)?;
                &row_arguments
            }
        };
        trace!(arguments = %arguments, "invoking");

        let connection = running.resolver.resolve(&layout.connection, row)?;
        let metadata = connection.metadata()?;
        let cursor = Cursor::new(running.operation.operation.invoke(metadata, arguments)?);

        let written = emit_rows(
            layout,
            row,
            cursor,
            config.always_pass_input_row,
            running.operation.name,
            sink,
        )?;
        running.rows_written += written as u64;
        Ok(written)
    }

    /// The output row shape, known once the first row has been processed.
    pub fn output_shape(&self) -> Option<&RowShape> {
        self.running
            .as_ref()
            .and_then(|r| r.layout.as_ref())
            .map(|layout| &layout.output_shape)
    }

    /// The output shape for a given input shape, without processing rows.
    pub fn describe_output(&self, input: &RowShape) -> StepResult<RowShape> {
        let operation = Catalog::lookup(&self.config.operation)?;
        Ok(fields::resolve(&self.config, operation, input)?.output_shape)
    }

    /// Number of live cached connections.
    pub fn cached_connections(&self) -> usize {
        self.running
            .as_ref()
            .map_or(0, |r| r.resolver.cached_connections())
    }

    /// `(rows read, rows written)` since open.
    pub fn counters(&self) -> (u64, u64) {
        self.running
            .as_ref()
            .map_or((0, 0), |r| (r.rows_read, r.rows_written))
    }

    /// Release every connection. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(mut running) = self.running.take() {
            let failures = running.resolver.close_all();
            debug!(
                rows_read = running.rows_read,
                rows_written = running.rows_written,
                failures,
                "metadata step closed"
            );
        }
    }
}

impl Drop for MetadataStep {
    fn drop(&mut self) {
        self.close();
    }
}
