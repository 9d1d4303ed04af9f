//! Operation table contract.

use metastep::catalog::{ArgumentType, Catalog, Operation};
use metastep::row::ValueType;
use metastep::StepError;

fn column_names(operation: &str) -> Vec<&'static str> {
    Catalog::lookup(operation)
        .unwrap()
        .columns
        .iter()
        .map(|c| c.name)
        .collect()
}

fn argument_names(operation: &str) -> Vec<&'static str> {
    Catalog::lookup(operation)
        .unwrap()
        .arguments
        .iter()
        .map(|a| a.name)
        .collect()
}

#[test]
fn test_every_operation_is_found_by_name() {
    let names: Vec<&str> = Catalog::operations().map(|op| op.name).collect();
    assert_eq!(
        names,
        vec![
            "getCatalogs",
            "getBestRowIdentifier",
            "getColumnPrivileges",
            "getColumns",
            "getCrossReference",
            "getExportedKeys",
            "getImportedKeys",
            "getPrimaryKeys",
            "getSchemas",
            "getTablePrivileges",
            "getTableTypes",
            "getTables",
            "getTypeInfo",
            "getVersionColumns",
        ]
    );

    for op in Operation::ALL {
        let found = Catalog::lookup(op.name()).unwrap();
        assert_eq!(found.operation, op);
        assert!(std::ptr::eq(found, op.descriptor()));
    }
}

#[test]
fn test_lookup_is_case_sensitive() {
    assert!(matches!(
        Catalog::lookup("gettables"),
        Err(StepError::UnknownOperation(_))
    ));
    assert!(matches!(
        Catalog::lookup(""),
        Err(StepError::UnknownOperation(_))
    ));
}

#[test]
fn test_get_tables_shape() {
    insta::assert_snapshot!(column_names("getTables").join("\n"), @r"
    TABLE_CAT
    TABLE_SCHEM
    TABLE_NAME
    TABLE_TYPE
    REMARKS
    TYPE_CAT
    TYPE_SCHEM
    TYPE_NAME
    SELF_REFERENCING_COL_NAME
    REF_GENERATION
    ");

    assert_eq!(
        argument_names("getTables"),
        vec!["catalog", "schemaPattern", "tableNamePattern", "tableTypes"]
    );
    let types = Catalog::lookup("getTables").unwrap().arguments[3];
    assert!(types.is_array);
    assert_eq!(types.type_name(), "String[]");
}

#[test]
fn test_get_columns_shape() {
    let columns = column_names("getColumns");
    assert_eq!(columns.len(), 24);
    assert_eq!(&columns[..4], &["TABLE_CAT", "TABLE_SCHEM", "TABLE_NAME", "COLUMN_NAME"]);
    assert_eq!(columns[16], "ORDINAL_POSITION");
    assert_eq!(columns[22], "IS_AUTOINCREMENT");

    assert_eq!(
        argument_names("getColumns"),
        vec!["catalog", "schemaPattern", "tableNamePattern", "columnNamePattern"]
    );

    let op = Catalog::lookup("getColumns").unwrap();
    assert_eq!(op.column("DATA_TYPE").unwrap().value_type, ValueType::Integer);
    assert_eq!(op.column("IS_NULLABLE").unwrap().value_type, ValueType::String);
}

#[test]
fn test_key_operations_share_columns() {
    let imported = column_names("getImportedKeys");
    assert_eq!(imported.len(), 14);
    assert_eq!(imported, column_names("getExportedKeys"));
    assert_eq!(imported, column_names("getCrossReference"));
    assert_eq!(
        argument_names("getCrossReference"),
        vec![
            "parentCatalog",
            "parentSchema",
            "parentTable",
            "foreignCatalog",
            "foreignSchema",
            "foreignTable",
        ]
    );
}

#[test]
fn test_best_row_identifier_arguments() {
    let op = Catalog::lookup("getBestRowIdentifier").unwrap();
    let types: Vec<ArgumentType> = op.arguments.iter().map(|a| a.ty).collect();
    assert_eq!(types.len(), 5);
    assert_eq!(types[4], ArgumentType::Boolean);
    assert_eq!(types[3].option_code("bestRowTemporary"), Some(0));
    assert_eq!(types[3].option_code("bestRowTransaction"), Some(1));

    assert_eq!(column_names("getBestRowIdentifier"), column_names("getVersionColumns"));
    assert_eq!(op.columns[7].name, "COL_PSEUDO_COLUMN");
}

#[test]
fn test_type_info_boolean_columns() {
    let op = Catalog::lookup("getTypeInfo").unwrap();
    assert!(op.arguments.is_empty());
    let booleans: Vec<&str> = op
        .columns
        .iter()
        .filter(|c| c.value_type == ValueType::Boolean)
        .map(|c| c.name)
        .collect();
    assert_eq!(
        booleans,
        vec!["CASE_SENSITIVE", "UNSIGNED_ATTRIBUTE", "FIXED_PREC_SCALE", "AUTO_INCREMENT"]
    );
}

#[test]
fn test_column_names_unique_within_operation() {
    for op in Catalog::operations() {
        let mut names: Vec<&str> = op.columns.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), op.columns.len(), "{}", op.name);
        assert!(!op.columns.is_empty(), "{}", op.name);
    }
}
