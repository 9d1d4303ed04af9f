//! A minimal host pipeline.
//!
//! Supplies rows to a [`MetadataStep`] and collects what it writes, driving
//! the `open` → `process`* → `close` lifecycle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StepResult;
use crate::row::{Row, RowShape};
use crate::step::MetadataStep;

/// Upstream rows.
pub trait RowSource {
    /// Shape of every row this source yields.
    fn shape(&self) -> &RowShape;

    /// The next row, or `None` when exhausted.
    fn get_row(&mut self) -> StepResult<Option<Row>>;
}

/// Downstream consumer.
pub trait RowSink {
    fn put_row(&mut self, shape: &RowShape, row: Row) -> StepResult<()>;

    /// Called once when no more rows will be written.
    fn finish(&mut self) -> StepResult<()> {
        Ok(())
    }
}

/// Rows held in memory, serialized as `{"fields": [...], "rows": [[...]]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowBatch {
    pub fields: RowShape,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl RowBatch {
    pub fn new(fields: RowShape, rows: Vec<Row>) -> Self {
        Self { fields, rows }
    }

    /// A single row with no fields: one invocation with constant arguments.
    pub fn single_empty_row() -> Self {
        Self::new(RowShape::empty(), vec![Vec::new()])
    }
}

/// Source over an in-memory batch.
#[derive(Debug)]
pub struct VecSource {
    shape: RowShape,
    rows: std::vec::IntoIter<Row>,
}

impl VecSource {
    pub fn new(batch: RowBatch) -> Self {
        Self {
            shape: batch.fields,
            rows: batch.rows.into_iter(),
        }
    }
}

impl RowSource for VecSource {
    fn shape(&self) -> &RowShape {
        &self.shape
    }

    fn get_row(&mut self) -> StepResult<Option<Row>> {
        Ok(self.rows.next())
    }
}

/// Sink collecting rows in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    batch: RowBatch,
    finished: bool,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.batch.rows
    }

    pub fn shape(&self) -> &RowShape {
        &self.batch.fields
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_batch(self) -> RowBatch {
        self.batch
    }
}

impl RowSink for VecSink {
    fn put_row(&mut self, shape: &RowShape, row: Row) -> StepResult<()> {
        if self.batch.rows.is_empty() {
            self.batch.fields = shape.clone();
        }
        self.batch.rows.push(row);
        Ok(())
    }

    fn finish(&mut self) -> StepResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Totals of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_read: u64,
    pub rows_written: u64,
}

/// Run `step` over every row of `source`.
///
/// `close` runs exactly once whether or not the run succeeds. Rows written
/// before a failure stay in `sink`.
pub fn run_step(
    step: &mut MetadataStep,
    source: &mut dyn RowSource,
    sink: &mut dyn RowSink,
) -> StepResult<RunSummary> {
    let result = drive(step, source, sink);
    step.close();
    result
}

fn drive(
    step: &mut MetadataStep,
    source: &mut dyn RowSource,
    sink: &mut dyn RowSink,
) -> StepResult<RunSummary> {
    step.try_open()?;
    while step.process(source, sink)? {}

    let (rows_read, rows_written) = step.counters();
    debug!(rows_read, rows_written, "run finished");
    Ok(RunSummary {
        rows_read,
        rows_written,
    })
}

/// Run over an in-memory batch and return the output batch.
pub fn run_batch(step: &mut MetadataStep, input: RowBatch) -> StepResult<(RowBatch, RunSummary)> {
    let mut source = VecSource::new(input);
    let mut sink = VecSink::new();
    let summary = run_step(step, &mut source, &mut sink)?;

    let mut output = sink.into_batch();
    if output.rows.is_empty() {
        // Nothing written: still report the shape the stage would produce.
        if let Ok(shape) = step.describe_output(source.shape()) {
            output.fields = shape;
        }
    }
    Ok((output, summary))
}
