//! SQL column types reported by result sets.

use std::fmt;

/// Declared SQL type of a result-set column.
///
/// Codes follow the `java.sql.Types` constants that metadata result sets are
/// specified against, so `DATA_TYPE` columns carry the familiar numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Numeric,
    Varchar,
    Boolean,
    Blob,
    Null,
    Other,
}

impl SqlType {
    /// The `java.sql.Types` code for this type.
    pub fn code(&self) -> i32 {
        match self {
            SqlType::Bit => -7,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Real => 7,
            SqlType::Double => 8,
            SqlType::Numeric => 2,
            SqlType::Varchar => 12,
            SqlType::Boolean => 16,
            SqlType::Blob => 2004,
            SqlType::Null => 0,
            SqlType::Other => 1111,
        }
    }

    /// Whether drivers commonly use this type to smuggle booleans as 0/1.
    pub fn is_small_integral(&self) -> bool {
        matches!(self, SqlType::Integer | SqlType::SmallInt | SqlType::TinyInt)
    }

    /// Map a declared column type to a SQL type using SQLite's affinity rules.
    ///
    /// See <https://www.sqlite.org/datatype3.html#determination_of_column_affinity>.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        if upper.is_empty() {
            SqlType::Blob
        } else if upper.contains("INT") {
            SqlType::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            SqlType::Varchar
        } else if upper.contains("BLOB") {
            SqlType::Blob
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            SqlType::Double
        } else if upper.contains("BOOL") {
            SqlType::Boolean
        } else {
            SqlType::Numeric
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlType::Bit => "BIT",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Numeric => "NUMERIC",
            SqlType::Varchar => "VARCHAR",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Blob => "BLOB",
            SqlType::Null => "NULL",
            SqlType::Other => "OTHER",
        };
        f.write_str(name)
    }
}
