//! First-row field layout resolution.

use metastep::catalog::Catalog;
use metastep::config::{ConnectionSource, OutputField, StepConfig};
use metastep::fields::{resolve, ConnectionFields, FieldBinding};
use metastep::row::{FieldMeta, RowShape, ValueType};
use metastep::StepError;

fn shape(names: &[&str]) -> RowShape {
    names.iter().copied().map(FieldMeta::string).collect()
}

fn columns_config() -> StepConfig {
    StepConfig {
        arguments_from_fields: true,
        remove_argument_fields: true,
        arguments: ["catalog", "schema", "table", "pattern"]
            .map(String::from)
            .to_vec(),
        output_fields: vec![
            OutputField::keep("COLUMN_NAME"),
            OutputField::new("DATA_TYPE", "sql_type"),
            OutputField::keep("IS_NULLABLE"),
        ],
        ..StepConfig::for_operation("getColumns")
    }
}

#[test]
fn test_all_argument_fields_consumed() {
    let op = Catalog::lookup("getColumns").unwrap();
    let input = shape(&["catalog", "schema", "table", "pattern"]);
    let layout = resolve(&columns_config(), op, &input).unwrap();

    assert_eq!(
        layout.arguments,
        vec![
            FieldBinding::Index(0),
            FieldBinding::Index(1),
            FieldBinding::Index(2),
            FieldBinding::Index(3),
        ]
    );
    assert_eq!(layout.used_fields, vec![0, 1, 2, 3]);
    assert_eq!(layout.fields_to_copy, Some(vec![]));
    assert_eq!(layout.copied_width(), 0);

    let names: Vec<&str> = layout.output_shape.field_names().collect();
    assert_eq!(names, vec!["COLUMN_NAME", "sql_type", "IS_NULLABLE"]);
    assert_eq!(
        layout.output_shape.field(1).unwrap().value_type,
        ValueType::Integer
    );
    assert_eq!(
        layout.columns.iter().map(|c| c.position).collect::<Vec<_>>(),
        vec![4, 5, 18]
    );
}

#[test]
fn test_resolution_is_deterministic() {
    let op = Catalog::lookup("getColumns").unwrap();
    let input = shape(&["id", "pattern", "table", "schema", "catalog", "note"]);
    let first = resolve(&columns_config(), op, &input).unwrap();
    let second = resolve(&columns_config(), op, &input).unwrap();
    assert_eq!(first, second);

    assert_eq!(first.fields_to_copy, Some(vec![0, 5]));
    let names: Vec<&str> = first.output_shape.field_names().collect();
    assert_eq!(
        names,
        vec!["id", "note", "COLUMN_NAME", "sql_type", "IS_NULLABLE"]
    );
}

#[test]
fn test_missing_argument_field_names_the_argument() {
    let op = Catalog::lookup("getColumns").unwrap();
    let input = shape(&["catalog", "schema", "pattern"]);
    match resolve(&columns_config(), op, &input) {
        Err(StepError::ArgumentFieldNotFound { argument, field }) => {
            assert_eq!(argument, "tableNamePattern");
            assert_eq!(field, "table");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_blank_argument_field_provides_null() {
    let op = Catalog::lookup("getColumns").unwrap();
    let config = StepConfig {
        arguments: ["", "", "table", ""].map(String::from).to_vec(),
        ..columns_config()
    };
    let layout = resolve(&config, op, &shape(&["table", "other"])).unwrap();
    assert_eq!(
        layout.arguments,
        vec![
            FieldBinding::ProvideNull,
            FieldBinding::ProvideNull,
            FieldBinding::Index(0),
            FieldBinding::ProvideNull,
        ]
    );
    assert_eq!(layout.fields_to_copy, Some(vec![1]));

    let config = StepConfig {
        arguments: ["", " ", "table", ""].map(String::from).to_vec(),
        ..columns_config()
    };
    match resolve(&config, op, &shape(&["table", "other"])) {
        Err(StepError::ArgumentFieldNotFound { argument, field }) => {
            assert_eq!(argument, "schemaPattern");
            assert_eq!(field, " ");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_repeated_input_field_binds_last_occurrence() {
    let op = Catalog::lookup("getColumns").unwrap();
    let input = shape(&["table", "catalog", "schema", "table", "pattern"]);
    let layout = resolve(&columns_config(), op, &input).unwrap();
    assert_eq!(layout.arguments[2], FieldBinding::Index(3));
    assert_eq!(layout.used_fields, vec![1, 2, 3, 4]);
    assert_eq!(layout.fields_to_copy, Some(vec![0]));
}

#[test]
fn test_constant_arguments_keep_every_input_field() {
    let op = Catalog::lookup("getTables").unwrap();
    let config = StepConfig {
        arguments: ["", "public", "", "TABLE"].map(String::from).to_vec(),
        remove_argument_fields: true,
        output_fields: vec![OutputField::keep("TABLE_NAME")],
        ..StepConfig::for_operation("getTables")
    };
    let layout = resolve(&config, op, &shape(&["public", "x"])).unwrap();
    assert!(layout.arguments.is_empty());
    assert!(layout.used_fields.is_empty());
    assert_eq!(layout.fields_to_copy, None);
    assert_eq!(layout.output_shape.len(), 3);
}

#[test]
fn test_connection_fields() {
    let op = Catalog::lookup("getTableTypes").unwrap();
    let config = StepConfig {
        connection: ConnectionSource::JdbcFields {
            driver_field: "drv".into(),
            url_field: "url".into(),
            user_field: "usr".into(),
            password_field: "pwd".into(),
        },
        ..StepConfig::for_operation("getTableTypes")
    };

    let layout = resolve(&config, op, &shape(&["pwd", "usr", "url", "drv"])).unwrap();
    assert_eq!(
        layout.connection,
        ConnectionFields::Jdbc {
            driver: 3,
            url: 2,
            user: 1,
            password: 0,
        }
    );

    match resolve(&config, op, &shape(&["url", "usr"])) {
        Err(StepError::ConnectionFieldsNotFound(missing)) => {
            assert_eq!(missing, vec!["drv", "pwd"]);
        }
        other => panic!("unexpected {:?}", other),
    }

    let config = StepConfig {
        connection: ConnectionSource::ConnectionField { field: "db".into() },
        ..StepConfig::for_operation("getTableTypes")
    };
    let layout = resolve(&config, op, &shape(&["x", "db"])).unwrap();
    assert_eq!(layout.connection, ConnectionFields::Name(1));
}

#[test]
fn test_argument_count_mismatch() {
    let op = Catalog::lookup("getColumns").unwrap();
    let config = StepConfig {
        arguments: vec!["table".into()],
        ..columns_config()
    };
    assert!(matches!(
        resolve(&config, op, &shape(&["table"])),
        Err(StepError::ArgumentCountMismatch {
            operation: "getColumns",
            expected: 4,
            actual: 1
        })
    ));
}
