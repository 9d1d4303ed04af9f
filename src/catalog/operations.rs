//! The operation table.

use std::fmt;

use super::columns::*;
use super::OperationDescriptor;

/// A database-introspection operation.
///
/// Variants are declared in catalog order; `Operation as usize` indexes
/// [`DESCRIPTORS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetCatalogs,
    GetBestRowIdentifier,
    GetColumnPrivileges,
    GetColumns,
    GetCrossReference,
    GetExportedKeys,
    GetImportedKeys,
    GetPrimaryKeys,
    GetSchemas,
    GetTablePrivileges,
    GetTableTypes,
    GetTables,
    GetTypeInfo,
    GetVersionColumns,
}

impl Operation {
    /// All operations in catalog order.
    pub const ALL: [Operation; 14] = [
        Operation::GetCatalogs,
        Operation::GetBestRowIdentifier,
        Operation::GetColumnPrivileges,
        Operation::GetColumns,
        Operation::GetCrossReference,
        Operation::GetExportedKeys,
        Operation::GetImportedKeys,
        Operation::GetPrimaryKeys,
        Operation::GetSchemas,
        Operation::GetTablePrivileges,
        Operation::GetTableTypes,
        Operation::GetTables,
        Operation::GetTypeInfo,
        Operation::GetVersionColumns,
    ];

    pub fn descriptor(self) -> &'static OperationDescriptor {
        &DESCRIPTORS[self as usize]
    }

    /// The operation's name, e.g. `getTables`.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const FOREIGN_KEY_COLUMNS: &[super::ColumnDescriptor] = &[
    PKTABLE_CAT,
    PKTABLE_SCHEM,
    PKTABLE_NAME,
    PKCOLUMN_NAME,
    FKTABLE_CAT,
    FKTABLE_SCHEM,
    FKTABLE_NAME,
    FKCOLUMN_NAME,
    KEY_SEQ,
    UPDATE_RULE,
    DELETE_RULE,
    FK_NAME,
    PK_NAME,
    DEFERRABILITY,
];

const ROW_IDENTIFIER_COLUMNS: &[super::ColumnDescriptor] = &[
    SCOPE,
    COLUMN_NAME,
    DATA_TYPE,
    TYPE_NAME,
    COLUMN_SIZE,
    BUFFER_LENGTH,
    DECIMAL_DIGITS,
    PSEUDO_COLUMN,
];

pub(super) static DESCRIPTORS: [OperationDescriptor; 14] = [
    OperationDescriptor {
        operation: Operation::GetCatalogs,
        name: "getCatalogs",
        arguments: &[],
        columns: &[TABLE_CAT],
    },
    OperationDescriptor {
        operation: Operation::GetBestRowIdentifier,
        name: "getBestRowIdentifier",
        arguments: &[ARG_CATALOG, ARG_SCHEMA, ARG_TABLE, ARG_SCOPE, ARG_NULLABLE],
        columns: ROW_IDENTIFIER_COLUMNS,
    },
    OperationDescriptor {
        operation: Operation::GetColumnPrivileges,
        name: "getColumnPrivileges",
        arguments: &[ARG_CATALOG, ARG_SCHEMA, ARG_TABLE, ARG_COLUMN_NAME_PATTERN],
        columns: &[
            TABLE_CAT,
            TABLE_SCHEM,
            TABLE_NAME,
            COLUMN_NAME,
            GRANTOR,
            GRANTEE,
            PRIVILEGE,
            IS_GRANTABLE,
        ],
    },
    OperationDescriptor {
        operation: Operation::GetColumns,
        name: "getColumns",
        arguments: &[
            ARG_CATALOG,
            ARG_SCHEMA_PATTERN,
            ARG_TABLE_NAME_PATTERN,
            ARG_COLUMN_NAME_PATTERN,
        ],
        columns: &[
            TABLE_CAT,
            TABLE_SCHEM,
            TABLE_NAME,
            COLUMN_NAME,
            DATA_TYPE,
            TYPE_NAME,
            COLUMN_SIZE,
            BUFFER_LENGTH,
            DECIMAL_DIGITS,
            NUM_PREC_RADIX,
            NULLABLE,
            REMARKS,
            COLUMN_DEF,
            SQL_DATA_TYPE,
            SQL_DATETIME_SUB,
            CHAR_OCTET_LENGTH,
            ORDINAL_POSITION,
            IS_NULLABLE,
            SCOPE_CATALOG,
            SCOPE_SCHEMA,
            SCOPE_TABLE,
            SOURCE_DATA_TYPE,
            IS_AUTOINCREMENT,
            IS_GENERATEDCOLUMN,
        ],
    },
    OperationDescriptor {
        operation: Operation::GetCrossReference,
        name: "getCrossReference",
        arguments: &[
            ARG_PARENT_CATALOG,
            ARG_PARENT_SCHEMA,
            ARG_PARENT_TABLE,
            ARG_FOREIGN_CATALOG,
            ARG_FOREIGN_SCHEMA,
            ARG_FOREIGN_TABLE,
        ],
        columns: FOREIGN_KEY_COLUMNS,
    },
    OperationDescriptor {
        operation: Operation::GetExportedKeys,
        name: "getExportedKeys",
        arguments: &[ARG_CATALOG, ARG_SCHEMA, ARG_TABLE],
        columns: FOREIGN_KEY_COLUMNS,
    },
    OperationDescriptor {
        operation: Operation::GetImportedKeys,
        name: "getImportedKeys",
        arguments: &[ARG_CATALOG, ARG_SCHEMA, ARG_TABLE],
        columns: FOREIGN_KEY_COLUMNS,
    },
    OperationDescriptor {
        operation: Operation::GetPrimaryKeys,
        name: "getPrimaryKeys",
        arguments: &[ARG_CATALOG, ARG_SCHEMA, ARG_TABLE],
        columns: &[
            TABLE_CAT,
            TABLE_SCHEM,
            TABLE_NAME,
            COLUMN_NAME,
            KEY_SEQ,
            PK_NAME,
        ],
    },
    OperationDescriptor {
        operation: Operation::GetSchemas,
        name: "getSchemas",
        arguments: &[],
        columns: &[TABLE_SCHEM, TABLE_CATALOG],
    },
    OperationDescriptor {
        operation: Operation::GetTablePrivileges,
        name: "getTablePrivileges",
        arguments: &[ARG_CATALOG, ARG_SCHEMA_PATTERN, ARG_TABLE_NAME_PATTERN],
        columns: &[
            TABLE_CAT,
            TABLE_SCHEM,
            TABLE_NAME,
            GRANTOR,
            GRANTEE,
            PRIVILEGE,
            IS_GRANTABLE,
        ],
    },
    OperationDescriptor {
        operation: Operation::GetTableTypes,
        name: "getTableTypes",
        arguments: &[],
        columns: &[TABLE_TYPE],
    },
    OperationDescriptor {
        operation: Operation::GetTables,
        name: "getTables",
        arguments: &[
            ARG_CATALOG,
            ARG_SCHEMA_PATTERN,
            ARG_TABLE_NAME_PATTERN,
            ARG_TABLE_TYPES,
        ],
        columns: &[
            TABLE_CAT,
            TABLE_SCHEM,
            TABLE_NAME,
            TABLE_TYPE,
            REMARKS,
            TYPE_CAT,
            TYPE_SCHEM,
            TYPE_NAME,
            SELF_REFERENCING_COL_NAME,
            REF_GENERATION,
        ],
    },
    OperationDescriptor {
        operation: Operation::GetTypeInfo,
        name: "getTypeInfo",
        arguments: &[],
        columns: &[
            TYPE_NAME,
            DATA_TYPE,
            PRECISION,
            LITERAL_PREFIX,
            LITERAL_SUFFIX,
            CREATE_PARAMS,
            NULLABLE,
            CASE_SENSITIVE,
            SEARCHABLE,
            UNSIGNED_ATTRIBUTE,
            FIXED_PREC_SCALE,
            AUTO_INCREMENT,
            LOCAL_TYPE_NAME,
            MINIMUM_SCALE,
            MAXIMUM_SCALE,
            SQL_DATA_TYPE,
            SQL_DATETIME_SUB,
            NUM_PREC_RADIX,
        ],
    },
    OperationDescriptor {
        operation: Operation::GetVersionColumns,
        name: "getVersionColumns",
        arguments: &[ARG_CATALOG, ARG_SCHEMA, ARG_TABLE],
        columns: ROW_IDENTIFIER_COLUMNS,
    },
];
