//! Operation catalog.
//!
//! A fixed, ordered table of database-introspection operations. Each entry
//! names the operation, its positional arguments and the ordered columns of
//! its result set. Names, argument order and column names form a
//! compatibility contract with the metadata API and with saved
//! configurations, so the table is reproduced exactly.
//!
//! Dispatch is a closed enumeration: every [`Operation`] maps onto one
//! strongly-typed [`DatabaseMetadata`](crate::driver::DatabaseMetadata)
//! method in [`Operation::invoke`].

pub mod columns;
mod invoke;
mod operations;

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::{StepError, StepResult};
use crate::row::ValueType;

pub use operations::Operation;

/// Semantic type of an operation argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    String,
    Boolean,
    Integer,
    /// An integer restricted to a named domain.
    Enumerated(&'static [(i32, &'static str)]),
}

impl ArgumentType {
    /// Code for a symbolic option name of an enumerated type.
    pub fn option_code(&self, name: &str) -> Option<i32> {
        match self {
            ArgumentType::Enumerated(options) => options
                .iter()
                .find(|(_, option)| *option == name)
                .map(|(code, _)| *code),
            _ => None,
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentType::String => f.write_str("String"),
            ArgumentType::Boolean => f.write_str("Boolean"),
            ArgumentType::Integer => f.write_str("Integer"),
            ArgumentType::Enumerated(options) => {
                let names: Vec<String> = options
                    .iter()
                    .map(|(code, name)| format!("{}={}", name, code))
                    .collect();
                write!(f, "Integer{{{}}}", names.join(", "))
            }
        }
    }
}

/// One positional argument of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    pub name: &'static str,
    /// Type of the argument, or of each element for array arguments.
    pub ty: ArgumentType,
    pub is_array: bool,
}

impl ArgumentDescriptor {
    pub const fn new(name: &'static str, ty: ArgumentType, is_array: bool) -> Self {
        Self { name, ty, is_array }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, ArgumentType::String, false)
    }

    /// Type name for messages, e.g. `String[]`.
    pub fn type_name(&self) -> String {
        if self.is_array {
            format!("{}[]", self.ty)
        } else {
            self.ty.to_string()
        }
    }
}

/// One column of an operation's result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub value_type: ValueType,
}

impl ColumnDescriptor {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            value_type: ValueType::String,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            value_type: ValueType::Integer,
        }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self {
            name,
            value_type: ValueType::Boolean,
        }
    }
}

/// Name, arguments and result columns of one operation.
#[derive(Debug, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub operation: Operation,
    pub name: &'static str,
    pub arguments: &'static [ArgumentDescriptor],
    pub columns: &'static [ColumnDescriptor],
}

impl OperationDescriptor {
    /// 0-based position of a result column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

static BY_NAME: Lazy<HashMap<&'static str, Operation>> = Lazy::new(|| {
    Operation::ALL
        .iter()
        .map(|op| (op.name(), *op))
        .collect()
});

/// Read-only access to the operation table.
pub struct Catalog;

impl Catalog {
    /// All operation descriptors in catalog order.
    pub fn operations() -> impl Iterator<Item = &'static OperationDescriptor> {
        Operation::ALL.iter().map(|op| op.descriptor())
    }

    /// Find an operation by name.
    pub fn lookup(name: &str) -> StepResult<&'static OperationDescriptor> {
        BY_NAME
            .get(name)
            .map(|op| op.descriptor())
            .ok_or_else(|| StepError::UnknownOperation(name.to_string()))
    }
}
