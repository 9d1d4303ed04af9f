//! Field index resolution.
//!
//! Runs once per stream, on the first input row, and fixes where every
//! configured field reference lives in the input row and what the output row
//! looks like:
//!
//! ```text
//! input row:   [ catalog | schema | table | note ]
//!                  │         │        │       │
//!   arguments ◀────┴─────────┴────────┘       │  (removed when configured)
//!                                             ▼
//! output row:  [ note | COLUMN_NAME | TYPE_NAME ]
//!                copied   selected result columns
//! ```

use tracing::debug;

use crate::catalog::{ColumnDescriptor, OperationDescriptor};
use crate::config::{ConnectionSource, StepConfig};
use crate::error::{StepError, StepResult};
use crate::row::{FieldMeta, RowShape};

/// Where an argument's value comes from in the input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBinding {
    /// Not resolved yet.
    Unresolved,
    /// The argument was left blank; bind null.
    ProvideNull,
    /// 0-based position in the input row.
    Index(usize),
}

/// Positions of the connection parameters in the input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionFields {
    /// The connection does not come from the row.
    None,
    /// Field holding a connection name.
    Name(usize),
    Jdbc {
        driver: usize,
        url: usize,
        user: usize,
        password: usize,
    },
}

/// A selected result column and where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedColumn {
    pub column: &'static ColumnDescriptor,
    /// 1-based position in the operation's result set.
    pub position: usize,
    pub output_name: String,
}

/// Resolve the configured output fields against the operation's columns.
pub fn select_columns(
    config: &StepConfig,
    operation: &'static OperationDescriptor,
) -> StepResult<Vec<SelectedColumn>> {
    config
        .output_fields
        .iter()
        .map(|field| {
            let position = operation.column_index(&field.name).ok_or_else(|| {
                StepError::UnknownOutputColumn {
                    operation: operation.name,
                    column: field.name.clone(),
                }
            })?;
            Ok(SelectedColumn {
                column: &operation.columns[position],
                position: position + 1,
                output_name: field.output_name().to_string(),
            })
        })
        .collect()
}

/// Everything derived from the first input row's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub connection: ConnectionFields,
    /// One binding per argument when arguments come from fields, else empty.
    pub arguments: Vec<FieldBinding>,
    /// Distinct input positions consumed by arguments, first occurrence first.
    pub used_fields: Vec<usize>,
    /// Input positions copied to the output; `None` copies the whole row.
    pub fields_to_copy: Option<Vec<usize>>,
    pub input_width: usize,
    pub output_shape: RowShape,
    pub columns: Vec<SelectedColumn>,
}

impl Layout {
    /// Number of leading output positions filled from the input row.
    pub fn copied_width(&self) -> usize {
        self.fields_to_copy
            .as_ref()
            .map_or(self.input_width, Vec::len)
    }
}

/// Resolve all field references of `config` against `input`.
pub fn resolve(
    config: &StepConfig,
    operation: &'static OperationDescriptor,
    input: &RowShape,
) -> StepResult<Layout> {
    let connection = resolve_connection(&config.connection, input)?;

    let mut arguments = Vec::new();
    let mut used_fields = Vec::new();
    if config.arguments_from_fields {
        arguments = resolve_arguments(config, operation, input)?;
        for binding in &arguments {
            if let FieldBinding::Index(i) = *binding {
                if !used_fields.contains(&i) {
                    used_fields.push(i);
                }
            }
        }
    }

    let fields_to_copy = (config.arguments_from_fields && config.remove_argument_fields)
        .then(|| {
            (0..input.len())
                .filter(|i| !used_fields.contains(i))
                .collect::<Vec<_>>()
        });

    let columns = select_columns(config, operation)?;

    let mut output_shape = match &fields_to_copy {
        Some(indices) => input.select(indices),
        None => input.clone(),
    };
    for selected in &columns {
        output_shape.push(FieldMeta::new(
            selected.output_name.clone(),
            selected.column.value_type,
        ));
    }

    debug!(
        input_fields = input.len(),
        output_fields = output_shape.len(),
        removed = input.len() + columns.len() - output_shape.len(),
        "resolved field layout"
    );

    Ok(Layout {
        connection,
        arguments,
        used_fields,
        fields_to_copy,
        input_width: input.len(),
        output_shape,
        columns,
    })
}

fn resolve_connection(source: &ConnectionSource, input: &RowShape) -> StepResult<ConnectionFields> {
    match source {
        ConnectionSource::Connection { .. } | ConnectionSource::Jdbc { .. } => {
            Ok(ConnectionFields::None)
        }
        ConnectionSource::ConnectionField { field } => input
            .index_of(field)
            .map(ConnectionFields::Name)
            .ok_or_else(|| StepError::ConnectionFieldsNotFound(vec![field.clone()])),
        ConnectionSource::JdbcFields {
            driver_field,
            url_field,
            user_field,
            password_field,
        } => {
            let names = [driver_field, url_field, user_field, password_field];
            let indices: Vec<Option<usize>> = names.iter().map(|n| input.index_of(n)).collect();
            match indices[..] {
                [Some(driver), Some(url), Some(user), Some(password)] => Ok(ConnectionFields::Jdbc {
                    driver,
                    url,
                    user,
                    password,
                }),
                _ => Err(StepError::ConnectionFieldsNotFound(
                    names
                        .iter()
                        .zip(&indices)
                        .filter(|(_, idx)| idx.is_none())
                        .map(|(name, _)| name.to_string())
                        .collect(),
                )),
            }
        }
    }
}

fn resolve_arguments(
    config: &StepConfig,
    operation: &'static OperationDescriptor,
    input: &RowShape,
) -> StepResult<Vec<FieldBinding>> {
    if config.arguments.len() != operation.arguments.len() {
        return Err(StepError::ArgumentCountMismatch {
            operation: operation.name,
            expected: operation.arguments.len(),
            actual: config.arguments.len(),
        });
    }

    operation
        .arguments
        .iter()
        .zip(&config.arguments)
        .map(|(arg, field)| match input.index_of(field) {
            Some(i) => Ok(FieldBinding::Index(i)),
            None if field.is_empty() => Ok(FieldBinding::ProvideNull),
            None => Err(StepError::ArgumentFieldNotFound {
                argument: arg.name,
                field: field.clone(),
            }),
        })
        .collect()
}
