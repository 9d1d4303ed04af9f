//! Output row assembly and result coercion.

use tracing::warn;

use crate::driver::{DriverError, ResultSet, SqlType};
use crate::error::{StepError, StepResult};
use crate::fields::Layout;
use crate::pipeline::RowSink;
use crate::row::{Row, Value, ValueType};

/// Owns a result set and closes it when dropped, on every exit path.
pub(crate) struct Cursor {
    inner: Box<dyn ResultSet>,
}

impl Cursor {
    pub(crate) fn new(inner: Box<dyn ResultSet>) -> Self {
        Self { inner }
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        if let Err(e) = self.inner.close() {
            warn!(error = %e, "failed to close result set");
        }
    }
}

/// The output row before any result columns are filled in.
pub(crate) fn base_row(layout: &Layout, input: &[Value]) -> Row {
    let mut row = vec![Value::Null; layout.output_shape.len()];
    match &layout.fields_to_copy {
        Some(indices) => {
            for (slot, &i) in indices.iter().enumerate() {
                row[slot] = input.get(i).cloned().unwrap_or_default();
            }
        }
        None => {
            for (slot, value) in input.iter().take(layout.input_width).enumerate() {
                row[slot] = value.clone();
            }
        }
    }
    row
}

/// Drain `cursor` into output rows. Returns the number of rows written.
pub(crate) fn emit_rows(
    layout: &Layout,
    input: &[Value],
    mut cursor: Cursor,
    always_pass_input_row: bool,
    operation: &'static str,
    sink: &mut dyn RowSink,
) -> StepResult<usize> {
    let invocation = |source: DriverError| StepError::Invocation { operation, source };
    let rs = cursor.inner.as_mut();

    let base = base_row(layout, input);
    let offset = layout.copied_width();
    let column_count = rs.column_count();
    let mut written = 0;

    while rs.next().map_err(invocation)? {
        let mut row = base.clone();
        for (j, selected) in layout.columns.iter().enumerate() {
            let k = selected.position;
            if k > column_count {
                continue;
            }
            let value = rs.get(k).map_err(invocation)?;
            let sql_type = rs.column_type(k).map_err(invocation)?;
            row[offset + j] = coerce(value, selected.column.value_type, sql_type)
                .map_err(|value| StepError::ResultConversion {
                    column: selected.column.name,
                    value: value.to_string(),
                    expected: selected.column.value_type,
                })?;
        }
        sink.put_row(&layout.output_shape, row)?;
        written += 1;
    }

    if written == 0 && always_pass_input_row {
        sink.put_row(&layout.output_shape, base)?;
        written = 1;
    }

    Ok(written)
}

/// Coerce a result value to the declared output type.
///
/// Drivers often report boolean columns as small integers; for those, 1 is
/// true and anything else false. Integer columns widen to 64 bits. Other
/// values pass through. SQL NULL reads as `false` or `0` for Boolean and
/// Integer columns and stays null otherwise. On failure the offending value
/// is returned.
pub fn coerce(value: Value, target: ValueType, sql_type: SqlType) -> Result<Value, Value> {
    if value.is_null() {
        return Ok(match target {
            ValueType::Boolean => Value::Boolean(false),
            ValueType::Integer => Value::Integer(0),
            ValueType::String | ValueType::Number => Value::Null,
        });
    }
    match target {
        ValueType::Boolean if sql_type.is_small_integral() => match &value {
            Value::Integer(n) => Ok(Value::Boolean(*n == 1)),
            Value::Boolean(b) => Ok(Value::Boolean(*b)),
            Value::Number(n) => Ok(Value::Boolean(*n == 1.0)),
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(n) => Ok(Value::Boolean(n == 1)),
                Err(_) => Err(value),
            },
            Value::Null => Ok(Value::Null),
        },
        ValueType::Boolean => match &value {
            Value::Boolean(b) => Ok(Value::Boolean(*b)),
            Value::Integer(n) => Ok(Value::Boolean(*n != 0)),
            Value::String(s) => match s.trim() {
                "1" => Ok(Value::Boolean(true)),
                "0" => Ok(Value::Boolean(false)),
                t if t.eq_ignore_ascii_case("true") => Ok(Value::Boolean(true)),
                t if t.eq_ignore_ascii_case("false") => Ok(Value::Boolean(false)),
                _ => Err(value),
            },
            _ => Err(value),
        },
        ValueType::Integer => match &value {
            Value::Integer(n) => Ok(Value::Integer(*n)),
            Value::Boolean(b) => Ok(Value::Integer(i64::from(*b))),
            Value::Number(n) if n.is_finite() => Ok(Value::Integer(n.trunc() as i64)),
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(n) => Ok(Value::Integer(n)),
                Err(_) => Err(value),
            },
            _ => Err(value),
        },
        ValueType::String | ValueType::Number => Ok(value),
    }
}
