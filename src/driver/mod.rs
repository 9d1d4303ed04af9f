//! Database-facing interface.
//!
//! The stage talks to databases only through the traits in this module,
//! mirroring standard SQL connection semantics:
//!
//! ```text
//! DriverRegistry ──connect(driver, url, user, password)──▶ Connection
//!                                                             │
//!                                                        metadata()
//!                                                             ▼
//!                                                     DatabaseMetadata
//!                                                             │
//!                                             get_tables(..), get_columns(..)
//!                                                             ▼
//!                                                        ResultSet
//!                                          next() / get(i) / column_type(i)
//! ```
//!
//! Every catalog operation has its own strongly-typed method on
//! [`DatabaseMetadata`]. Drivers implement what they support; the rest fall
//! back to [`DriverError::Unsupported`].

mod error;
mod registry;
mod rowset;
pub mod sqlite;
mod types;

pub use error::{DriverError, DriverResult};
pub use registry::{Driver, DriverRegistry};
pub use rowset::RowSet;
pub use sqlite::SqliteDriver;
pub use types::SqlType;

use crate::row::Value;

/// Cursor over the rows of a metadata query.
///
/// Columns are addressed 1-based, as in SQL result sets.
pub trait ResultSet {
    /// Advance to the next row. Returns `false` once past the last row.
    fn next(&mut self) -> DriverResult<bool>;

    /// Number of columns the result set actually has.
    fn column_count(&self) -> usize;

    /// Name of a column.
    fn column_name(&self, column: usize) -> DriverResult<&str>;

    /// Declared SQL type of a column.
    fn column_type(&self, column: usize) -> DriverResult<SqlType>;

    /// Value of a column in the current row.
    fn get(&self, column: usize) -> DriverResult<Value>;

    /// Release the cursor. Further reads fail.
    fn close(&mut self) -> DriverResult<()>;
}

/// Result type of every metadata call.
pub type MetadataCursor = DriverResult<Box<dyn ResultSet>>;

/// The metadata-introspection interface of a connection.
///
/// Arguments follow the positional order of the catalog descriptors. `None`
/// string arguments mean "do not filter on this criterion".
#[allow(unused_variables)]
pub trait DatabaseMetadata {
    fn get_catalogs(&self) -> MetadataCursor {
        Err(DriverError::Unsupported("getCatalogs"))
    }

    fn get_best_row_identifier(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: Option<&str>,
        scope: i32,
        nullable: bool,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getBestRowIdentifier"))
    }

    fn get_column_privileges(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: Option<&str>,
        column_name_pattern: Option<&str>,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getColumnPrivileges"))
    }

    fn get_columns(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        column_name_pattern: Option<&str>,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getColumns"))
    }

    fn get_cross_reference(
        &self,
        parent_catalog: Option<&str>,
        parent_schema: Option<&str>,
        parent_table: Option<&str>,
        foreign_catalog: Option<&str>,
        foreign_schema: Option<&str>,
        foreign_table: Option<&str>,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getCrossReference"))
    }

    fn get_exported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getExportedKeys"))
    }

    fn get_imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getImportedKeys"))
    }

    fn get_primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getPrimaryKeys"))
    }

    fn get_schemas(&self) -> MetadataCursor {
        Err(DriverError::Unsupported("getSchemas"))
    }

    fn get_table_privileges(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getTablePrivileges"))
    }

    fn get_table_types(&self) -> MetadataCursor {
        Err(DriverError::Unsupported("getTableTypes"))
    }

    fn get_tables(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        types: Option<&[String]>,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getTables"))
    }

    fn get_type_info(&self) -> MetadataCursor {
        Err(DriverError::Unsupported("getTypeInfo"))
    }

    fn get_version_columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> MetadataCursor {
        Err(DriverError::Unsupported("getVersionColumns"))
    }
}

/// A live database connection.
pub trait Connection: Send {
    /// The connection's metadata interface.
    fn metadata(&self) -> DriverResult<&dyn DatabaseMetadata>;

    /// Close the connection. Closing twice is a no-op.
    fn close(&mut self) -> DriverResult<()>;

    fn is_closed(&self) -> bool;
}
