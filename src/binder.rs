//! Argument binding.
//!
//! Turns configured strings or row values into typed operation arguments.
//!
//! Conversion rules for a single string:
//!
//! | Argument type | Rule                                             |
//! |---------------|--------------------------------------------------|
//! | String        | passed through                                   |
//! | Boolean       | exactly `"Y"` is true, anything else false       |
//! | Integer       | base-10 `i32`, otherwise a conversion error      |
//! | enumerated    | base-10 `i32`, or the symbolic option name       |
//!
//! Array arguments are comma-separated lists. An empty list string binds
//! null, never a zero-length array.

use std::fmt;

use crate::catalog::{ArgumentDescriptor, ArgumentType, OperationDescriptor};
use crate::error::{StepError, StepResult};
use crate::fields::FieldBinding;
use crate::row::Value;

/// A typed argument value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArgValue {
    #[default]
    Null,
    String(String),
    Boolean(bool),
    Integer(i32),
    Array(Vec<ArgValue>),
}

impl ArgValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Null => f.write_str("null"),
            ArgValue::String(s) => write!(f, "{:?}", s),
            ArgValue::Boolean(b) => write!(f, "{}", b),
            ArgValue::Integer(n) => write!(f, "{}", n),
            ArgValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Convert one string to a value of the argument's (element) type.
pub fn string_to_argument_value(value: &str, arg: &ArgumentDescriptor) -> StepResult<ArgValue> {
    let converted = match arg.ty {
        ArgumentType::String => ArgValue::String(value.to_string()),
        ArgumentType::Boolean => ArgValue::Boolean(value == "Y"),
        ArgumentType::Integer => ArgValue::Integer(parse_integer(value, arg)?),
        ArgumentType::Enumerated(_) => match arg.ty.option_code(value) {
            Some(code) => ArgValue::Integer(code),
            None => ArgValue::Integer(parse_integer(value, arg)?),
        },
    };
    Ok(converted)
}

fn parse_integer(value: &str, arg: &ArgumentDescriptor) -> StepResult<i32> {
    value.parse::<i32>().map_err(|_| StepError::TypeConversion {
        argument: arg.name,
        value: value.to_string(),
        expected: arg.ty.to_string(),
    })
}

/// Split a comma-separated list and convert every element.
///
/// Trailing empty elements are dropped (`"a,b,"` has two elements, `","`
/// none); interior empty elements are kept. An empty string is null.
pub fn string_list_to_array(value: &str, arg: &ArgumentDescriptor) -> StepResult<ArgValue> {
    if value.is_empty() {
        return Ok(ArgValue::Null);
    }
    let mut parts: Vec<&str> = value.split(',').collect();
    while parts.last() == Some(&"") {
        parts.pop();
    }
    let items = parts
        .into_iter()
        .map(|part| string_to_argument_value(part, arg))
        .collect::<StepResult<Vec<_>>>()?;
    Ok(ArgValue::Array(items))
}

/// Bind a configured constant. Empty constants bind null.
pub fn bind_constant(value: &str, arg: &ArgumentDescriptor) -> StepResult<ArgValue> {
    if value.is_empty() {
        Ok(ArgValue::Null)
    } else if arg.is_array {
        string_list_to_array(value, arg)
    } else {
        string_to_argument_value(value, arg)
    }
}

/// Bind a value read from an input row field.
pub fn bind_field_value(value: &Value, arg: &ArgumentDescriptor) -> StepResult<ArgValue> {
    match (value, arg.ty) {
        (Value::Null, _) => Ok(ArgValue::Null),
        (Value::String(s), _) if arg.is_array => string_list_to_array(s, arg),
        (_, _) if arg.is_array => Err(StepError::UnsupportedArgumentType {
            argument: arg.name,
            kind: value.kind(),
        }),
        (Value::String(s), ArgumentType::String) => Ok(ArgValue::String(s.clone())),
        (Value::String(s), ArgumentType::Integer | ArgumentType::Enumerated(_))
            if s.is_empty() =>
        {
            Ok(ArgValue::Null)
        }
        (Value::String(s), _) => string_to_argument_value(s, arg),
        (Value::Boolean(b), ArgumentType::Boolean) => Ok(ArgValue::Boolean(*b)),
        (Value::Integer(n), ArgumentType::Integer | ArgumentType::Enumerated(_)) => {
            i32::try_from(*n)
                .map(ArgValue::Integer)
                .map_err(|_| StepError::TypeConversion {
                    argument: arg.name,
                    value: n.to_string(),
                    expected: arg.ty.to_string(),
                })
        }
        (other, _) => Err(StepError::TypeConversion {
            argument: arg.name,
            value: other.to_string(),
            expected: arg.type_name(),
        }),
    }
}

/// Arguments bound for one invocation, in descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    operation: &'static OperationDescriptor,
    values: Vec<ArgValue>,
}

impl BoundArguments {
    /// Bind configured constants, after variable substitution.
    pub fn from_constants(
        operation: &'static OperationDescriptor,
        arguments: &[String],
    ) -> StepResult<Self> {
        check_count(operation, arguments.len())?;
        let values = operation
            .arguments
            .iter()
            .zip(arguments)
            .map(|(arg, value)| bind_constant(value, arg))
            .collect::<StepResult<Vec<_>>>()?;
        Ok(Self { operation, values })
    }

    /// Bind from the fields of an input row.
    pub fn from_row(
        operation: &'static OperationDescriptor,
        bindings: &[FieldBinding],
        row: &[Value],
    ) -> StepResult<Self> {
        check_count(operation, bindings.len())?;
        let mut values = Vec::with_capacity(bindings.len());
        for (arg, binding) in operation.arguments.iter().zip(bindings) {
            let value = match binding {
                FieldBinding::Index(i) => match row.get(*i) {
                    Some(v) => bind_field_value(v, arg)?,
                    None => ArgValue::Null,
                },
                FieldBinding::ProvideNull | FieldBinding::Unresolved => ArgValue::Null,
            };
            values.push(value);
        }
        Ok(Self { operation, values })
    }

    pub fn operation(&self) -> &'static OperationDescriptor {
        self.operation
    }

    pub fn values(&self) -> &[ArgValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn value(&self, index: usize) -> (&'static ArgumentDescriptor, &ArgValue) {
        (&self.operation.arguments[index], &self.values[index])
    }

    fn mismatch(&self, index: usize, expected: &str) -> StepError {
        let (arg, value) = self.value(index);
        StepError::TypeConversion {
            argument: arg.name,
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// A nullable string argument.
    pub fn string(&self, index: usize) -> StepResult<Option<&str>> {
        match self.value(index).1 {
            ArgValue::Null => Ok(None),
            ArgValue::String(s) => Ok(Some(s)),
            _ => Err(self.mismatch(index, "String")),
        }
    }

    /// A non-null integer argument.
    pub fn integer(&self, index: usize) -> StepResult<i32> {
        match self.value(index) {
            (_, ArgValue::Integer(n)) => Ok(*n),
            (arg, ArgValue::Null) => Err(StepError::NullArgument {
                operation: self.operation.name,
                argument: arg.name,
            }),
            _ => Err(self.mismatch(index, "Integer")),
        }
    }

    /// A non-null boolean argument.
    pub fn boolean(&self, index: usize) -> StepResult<bool> {
        match self.value(index) {
            (_, ArgValue::Boolean(b)) => Ok(*b),
            (arg, ArgValue::Null) => Err(StepError::NullArgument {
                operation: self.operation.name,
                argument: arg.name,
            }),
            _ => Err(self.mismatch(index, "Boolean")),
        }
    }

    /// A nullable string-array argument.
    pub fn string_array(&self, index: usize) -> StepResult<Option<Vec<String>>> {
        match self.value(index).1 {
            ArgValue::Null => Ok(None),
            ArgValue::Array(items) => items
                .iter()
                .map(|item| match item {
                    ArgValue::String(s) => Ok(s.clone()),
                    _ => Err(self.mismatch(index, "String[]")),
                })
                .collect::<StepResult<Vec<_>>>()
                .map(Some),
            _ => Err(self.mismatch(index, "String[]")),
        }
    }
}

impl fmt::Display for BoundArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operation.name)?;
        for (i, (arg, value)) in self.operation.arguments.iter().zip(&self.values).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", arg.name, value)?;
        }
        f.write_str(")")
    }
}

fn check_count(operation: &OperationDescriptor, actual: usize) -> StepResult<()> {
    if operation.arguments.len() != actual {
        return Err(StepError::ArgumentCountMismatch {
            operation: operation.name,
            expected: operation.arguments.len(),
            actual,
        });
    }
    Ok(())
}
