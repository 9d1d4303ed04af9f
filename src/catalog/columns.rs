//! Shared argument and result-column descriptors.
//!
//! Operations reuse the same descriptors (`TABLE_CAT`, `catalog`, ...), so
//! they are declared once here and referenced from the operation table.

use super::{ArgumentDescriptor, ArgumentType, ColumnDescriptor};

// Scope domain of getBestRowIdentifier.
pub const BEST_ROW_TEMPORARY: i32 = 0;
pub const BEST_ROW_TRANSACTION: i32 = 1;
pub const BEST_ROW_SESSION: i32 = 2;

pub const SCOPE_OPTIONS: &[(i32, &str)] = &[
    (BEST_ROW_TEMPORARY, "bestRowTemporary"),
    (BEST_ROW_TRANSACTION, "bestRowTransaction"),
    (BEST_ROW_SESSION, "bestRowSession"),
];

pub const ARG_CATALOG: ArgumentDescriptor = ArgumentDescriptor::string("catalog");
pub const ARG_SCHEMA: ArgumentDescriptor = ArgumentDescriptor::string("schema");
pub const ARG_TABLE: ArgumentDescriptor = ArgumentDescriptor::string("table");
pub const ARG_COLUMN_NAME_PATTERN: ArgumentDescriptor =
    ArgumentDescriptor::string("columnNamePattern");
pub const ARG_NULLABLE: ArgumentDescriptor =
    ArgumentDescriptor::new("nullable", ArgumentType::Boolean, false);
pub const ARG_SCHEMA_PATTERN: ArgumentDescriptor = ArgumentDescriptor::string("schemaPattern");
pub const ARG_SCOPE: ArgumentDescriptor =
    ArgumentDescriptor::new("scope", ArgumentType::Enumerated(SCOPE_OPTIONS), false);
pub const ARG_TABLE_TYPES: ArgumentDescriptor =
    ArgumentDescriptor::new("tableTypes", ArgumentType::String, true);
pub const ARG_TABLE_NAME_PATTERN: ArgumentDescriptor =
    ArgumentDescriptor::string("tableNamePattern");
pub const ARG_PARENT_CATALOG: ArgumentDescriptor = ArgumentDescriptor::string("parentCatalog");
pub const ARG_PARENT_SCHEMA: ArgumentDescriptor = ArgumentDescriptor::string("parentSchema");
pub const ARG_PARENT_TABLE: ArgumentDescriptor = ArgumentDescriptor::string("parentTable");
pub const ARG_FOREIGN_CATALOG: ArgumentDescriptor = ArgumentDescriptor::string("foreignCatalog");
pub const ARG_FOREIGN_SCHEMA: ArgumentDescriptor = ArgumentDescriptor::string("foreignSchema");
pub const ARG_FOREIGN_TABLE: ArgumentDescriptor = ArgumentDescriptor::string("foreignTable");

pub const TABLE_CAT: ColumnDescriptor = ColumnDescriptor::string("TABLE_CAT");
pub const PKTABLE_CAT: ColumnDescriptor = ColumnDescriptor::string("PKTABLE_CAT");
pub const FKTABLE_CAT: ColumnDescriptor = ColumnDescriptor::string("FKTABLE_CAT");
pub const TABLE_CATALOG: ColumnDescriptor = ColumnDescriptor::string("TABLE_CATALOG");
pub const TABLE_SCHEM: ColumnDescriptor = ColumnDescriptor::string("TABLE_SCHEM");
pub const PKTABLE_SCHEM: ColumnDescriptor = ColumnDescriptor::string("PKTABLE_SCHEM");
pub const FKTABLE_SCHEM: ColumnDescriptor = ColumnDescriptor::string("FKTABLE_SCHEM");
pub const TABLE_NAME: ColumnDescriptor = ColumnDescriptor::string("TABLE_NAME");
pub const PKTABLE_NAME: ColumnDescriptor = ColumnDescriptor::string("PKTABLE_NAME");
pub const FKTABLE_NAME: ColumnDescriptor = ColumnDescriptor::string("FKTABLE_NAME");
pub const TABLE_TYPE: ColumnDescriptor = ColumnDescriptor::string("TABLE_TYPE");
pub const COLUMN_NAME: ColumnDescriptor = ColumnDescriptor::string("COLUMN_NAME");
pub const PKCOLUMN_NAME: ColumnDescriptor = ColumnDescriptor::string("PKCOLUMN_NAME");
pub const FKCOLUMN_NAME: ColumnDescriptor = ColumnDescriptor::string("FKCOLUMN_NAME");
pub const PK_NAME: ColumnDescriptor = ColumnDescriptor::string("PK_NAME");
pub const FK_NAME: ColumnDescriptor = ColumnDescriptor::string("FK_NAME");
pub const KEY_SEQ: ColumnDescriptor = ColumnDescriptor::integer("KEY_SEQ");
pub const UPDATE_RULE: ColumnDescriptor = ColumnDescriptor::integer("UPDATE_RULE");
pub const DELETE_RULE: ColumnDescriptor = ColumnDescriptor::integer("DELETE_RULE");
pub const DEFERRABILITY: ColumnDescriptor = ColumnDescriptor::integer("DEFERRABILITY");
pub const TYPE_NAME: ColumnDescriptor = ColumnDescriptor::string("TYPE_NAME");
pub const DATA_TYPE: ColumnDescriptor = ColumnDescriptor::integer("DATA_TYPE");
pub const PRECISION: ColumnDescriptor = ColumnDescriptor::integer("PRECISION");
pub const COLUMN_SIZE: ColumnDescriptor = ColumnDescriptor::integer("COLUMN_SIZE");
pub const BUFFER_LENGTH: ColumnDescriptor = ColumnDescriptor::integer("BUFFER_LENGTH");
pub const LITERAL_PREFIX: ColumnDescriptor = ColumnDescriptor::string("LITERAL_PREFIX");
pub const LITERAL_SUFFIX: ColumnDescriptor = ColumnDescriptor::string("LITERAL_SUFFIX");
pub const CREATE_PARAMS: ColumnDescriptor = ColumnDescriptor::string("CREATE_PARAMS");
pub const NULLABLE: ColumnDescriptor = ColumnDescriptor::integer("NULLABLE");
pub const CASE_SENSITIVE: ColumnDescriptor = ColumnDescriptor::boolean("CASE_SENSITIVE");
pub const SEARCHABLE: ColumnDescriptor = ColumnDescriptor::integer("SEARCHABLE");
pub const UNSIGNED_ATTRIBUTE: ColumnDescriptor = ColumnDescriptor::boolean("UNSIGNED_ATTRIBUTE");
pub const FIXED_PREC_SCALE: ColumnDescriptor = ColumnDescriptor::boolean("FIXED_PREC_SCALE");
pub const AUTO_INCREMENT: ColumnDescriptor = ColumnDescriptor::boolean("AUTO_INCREMENT");
pub const LOCAL_TYPE_NAME: ColumnDescriptor = ColumnDescriptor::string("LOCAL_TYPE_NAME");
pub const MINIMUM_SCALE: ColumnDescriptor = ColumnDescriptor::integer("MINIMUM_SCALE");
pub const MAXIMUM_SCALE: ColumnDescriptor = ColumnDescriptor::integer("MAXIMUM_SCALE");
pub const DECIMAL_DIGITS: ColumnDescriptor = ColumnDescriptor::integer("DECIMAL_DIGITS");
pub const SQL_DATA_TYPE: ColumnDescriptor = ColumnDescriptor::integer("SQL_DATA_TYPE");
pub const SQL_DATETIME_SUB: ColumnDescriptor = ColumnDescriptor::integer("SQL_DATETIME_SUB");
pub const SOURCE_DATA_TYPE: ColumnDescriptor = ColumnDescriptor::integer("SOURCE_DATA_TYPE");
pub const NUM_PREC_RADIX: ColumnDescriptor = ColumnDescriptor::integer("NUM_PREC_RADIX");
pub const REMARKS: ColumnDescriptor = ColumnDescriptor::string("REMARKS");
pub const TYPE_CAT: ColumnDescriptor = ColumnDescriptor::string("TYPE_CAT");
pub const TYPE_SCHEM: ColumnDescriptor = ColumnDescriptor::string("TYPE_SCHEM");
pub const SELF_REFERENCING_COL_NAME: ColumnDescriptor =
    ColumnDescriptor::string("SELF_REFERENCING_COL_NAME");
pub const REF_GENERATION: ColumnDescriptor = ColumnDescriptor::string("REF_GENERATION");
pub const SCOPE: ColumnDescriptor = ColumnDescriptor::integer("SCOPE");
/// Persisted under this name in existing configurations; keep it.
pub const PSEUDO_COLUMN: ColumnDescriptor = ColumnDescriptor::integer("COL_PSEUDO_COLUMN");
pub const GRANTOR: ColumnDescriptor = ColumnDescriptor::string("GRANTOR");
pub const GRANTEE: ColumnDescriptor = ColumnDescriptor::string("GRANTEE");
pub const PRIVILEGE: ColumnDescriptor = ColumnDescriptor::string("PRIVILEGE");
pub const IS_GRANTABLE: ColumnDescriptor = ColumnDescriptor::string("IS_GRANTABLE");
pub const COLUMN_DEF: ColumnDescriptor = ColumnDescriptor::string("COLUMN_DEF");
pub const CHAR_OCTET_LENGTH: ColumnDescriptor = ColumnDescriptor::integer("CHAR_OCTET_LENGTH");
pub const ORDINAL_POSITION: ColumnDescriptor = ColumnDescriptor::integer("ORDINAL_POSITION");
pub const IS_NULLABLE: ColumnDescriptor = ColumnDescriptor::string("IS_NULLABLE");
pub const SCOPE_CATALOG: ColumnDescriptor = ColumnDescriptor::string("SCOPE_CATALOG");
pub const SCOPE_SCHEMA: ColumnDescriptor = ColumnDescriptor::string("SCOPE_SCHEMA");
pub const SCOPE_TABLE: ColumnDescriptor = ColumnDescriptor::string("SCOPE_TABLE");
pub const IS_AUTOINCREMENT: ColumnDescriptor = ColumnDescriptor::string("IS_AUTOINCREMENT");
pub const IS_GENERATEDCOLUMN: ColumnDescriptor = ColumnDescriptor::string("IS_GENERATEDCOLUMN");
