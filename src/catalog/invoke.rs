//! Typed dispatch of operations onto the metadata interface.

use super::Operation;
use crate::binder::BoundArguments;
use crate::driver::{DatabaseMetadata, ResultSet};
use crate::error::{StepError, StepResult};

impl Operation {
    /// Call the operation with arguments bound in descriptor order.
    pub fn invoke(
        self,
        metadata: &dyn DatabaseMetadata,
        args: &BoundArguments,
    ) -> StepResult<Box<dyn ResultSet>> {
        let a = args;
        let cursor = match self {
            Operation::GetCatalogs => metadata.get_catalogs(),
            Operation::GetBestRowIdentifier => metadata.get_best_row_identifier(
                a.string(0)?,
                a.string(1)?,
                a.string(2)?,
                a.integer(3)?,
                a.boolean(4)?,
            ),
            Operation::GetColumnPrivileges => metadata.get_column_privileges(
                a.string(0)?,
                a.string(1)?,
                a.string(2)?,
                a.string(3)?,
            ),
            Operation::GetColumns => {
                metadata.get_columns(a.string(0)?, a.string(1)?, a.string(2)?, a.string(3)?)
            }
            Operation::GetCrossReference => metadata.get_cross_reference(
                a.string(0)?,
                a.string(1)?,
                a.string(2)?,
                a.string(3)?,
                a.string(4)?,
                a.string(5)?,
            ),
            Operation::GetExportedKeys => {
                metadata.get_exported_keys(a.string(0)?, a.string(1)?, a.string(2)?)
            }
            Operation::GetImportedKeys => {
                metadata.get_imported_keys(a.string(0)?, a.string(1)?, a.string(2)?)
            }
            Operation::GetPrimaryKeys => {
                metadata.get_primary_keys(a.string(0)?, a.string(1)?, a.string(2)?)
            }
            Operation::GetSchemas => metadata.get_schemas(),
            Operation::GetTablePrivileges => {
                metadata.get_table_privileges(a.string(0)?, a.string(1)?, a.string(2)?)
            }
            Operation::GetTableTypes => metadata.get_table_types(),
            Operation::GetTables => {
                let types = a.string_array(3)?;
                metadata.get_tables(a.string(0)?, a.string(1)?, a.string(2)?, types.as_deref())
            }
            Operation::GetTypeInfo => metadata.get_type_info(),
            Operation::GetVersionColumns => {
                metadata.get_version_columns(a.string(0)?, a.string(1)?, a.string(2)?)
            }
        };

        cursor.map_err(|source| StepError::Invocation {
            operation: self.name(),
            source,
        })
    }
}
