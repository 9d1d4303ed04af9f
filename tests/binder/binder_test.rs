//! Argument conversion and binding.

use metastep::binder::{
    bind_constant, bind_field_value, string_list_to_array, string_to_argument_value, ArgValue,
    BoundArguments,
};
use metastep::catalog::columns::{ARG_NULLABLE, ARG_SCOPE, ARG_TABLE, ARG_TABLE_TYPES};
use metastep::catalog::Catalog;
use metastep::fields::FieldBinding;
use metastep::row::Value;
use metastep::StepError;

#[test]
fn test_strings_pass_through_unchanged() {
    for s in ["", " ", "users", "%", "a,b", "Y", "0042", "ünïcødé"] {
        assert_eq!(
            string_to_argument_value(s, &ARG_TABLE).unwrap(),
            ArgValue::String(s.to_string())
        );
    }
}

#[test]
fn test_boolean_is_true_only_for_uppercase_y() {
    let cases = [("Y", true), ("y", false), ("N", false), ("true", false), ("", false)];
    for (input, expected) in cases {
        assert_eq!(
            string_to_argument_value(input, &ARG_NULLABLE).unwrap(),
            ArgValue::Boolean(expected),
            "{:?}",
            input
        );
    }
}

#[test]
fn test_integer_canonical_forms_round_trip() {
    for n in [0, 1, 2, -1, i32::MAX, i32::MIN] {
        assert_eq!(
            string_to_argument_value(&n.to_string(), &ARG_SCOPE).unwrap(),
            ArgValue::Integer(n)
        );
    }
    assert_eq!(
        string_to_argument_value("bestRowSession", &ARG_SCOPE).unwrap(),
        ArgValue::Integer(2)
    );
}

#[test]
fn test_integer_conversion_errors_name_the_argument() {
    for bad in ["two", "1.5", "2147483648", " 1"] {
        match string_to_argument_value(bad, &ARG_SCOPE) {
            Err(StepError::TypeConversion { argument, value, .. }) => {
                assert_eq!(argument, "scope");
                assert_eq!(value, bad);
            }
            other => panic!("{:?}: unexpected {:?}", bad, other),
        }
    }
}

#[test]
fn test_array_length_matches_split_without_trailing_empties() {
    let cases = [
        ("TABLE", 1),
        ("TABLE,VIEW", 2),
        ("TABLE,VIEW,", 2),
        ("TABLE,,VIEW", 3),
        (",TABLE", 2),
        (",", 0),
        (",,,", 0),
    ];
    for (input, len) in cases {
        match string_list_to_array(input, &ARG_TABLE_TYPES).unwrap() {
            ArgValue::Array(items) => assert_eq!(items.len(), len, "{:?}", input),
            other => panic!("{:?}: unexpected {:?}", input, other),
        }
    }
    assert_eq!(
        string_list_to_array("", &ARG_TABLE_TYPES).unwrap(),
        ArgValue::Null
    );
}

#[test]
fn test_blank_constants_bind_null() {
    assert_eq!(bind_constant("", &ARG_TABLE).unwrap(), ArgValue::Null);
    assert_eq!(bind_constant("", &ARG_SCOPE).unwrap(), ArgValue::Null);
    assert_eq!(
        bind_constant(" ", &ARG_TABLE).unwrap(),
        ArgValue::String(" ".into())
    );
    assert!(matches!(
        bind_constant("   ", &ARG_SCOPE),
        Err(StepError::TypeConversion { argument: "scope", .. })
    ));
    assert_eq!(bind_constant("", &ARG_TABLE_TYPES).unwrap(), ArgValue::Null);
    assert_eq!(
        bind_constant("TABLE,VIEW", &ARG_TABLE_TYPES).unwrap(),
        ArgValue::Array(vec![
            ArgValue::String("TABLE".into()),
            ArgValue::String("VIEW".into()),
        ])
    );
}

#[test]
fn test_field_values() {
    assert_eq!(bind_field_value(&Value::Null, &ARG_SCOPE).unwrap(), ArgValue::Null);
    assert_eq!(
        bind_field_value(&Value::string(""), &ARG_TABLE).unwrap(),
        ArgValue::String(String::new())
    );
    assert_eq!(
        bind_field_value(&Value::string(""), &ARG_SCOPE).unwrap(),
        ArgValue::Null
    );
    assert_eq!(
        bind_field_value(&Value::Integer(1), &ARG_SCOPE).unwrap(),
        ArgValue::Integer(1)
    );
    assert_eq!(
        bind_field_value(&Value::Boolean(true), &ARG_NULLABLE).unwrap(),
        ArgValue::Boolean(true)
    );
    assert!(matches!(
        bind_field_value(&Value::Integer(i64::MAX), &ARG_SCOPE),
        Err(StepError::TypeConversion { argument: "scope", .. })
    ));
    assert!(matches!(
        bind_field_value(&Value::Integer(3), &ARG_TABLE_TYPES),
        Err(StepError::UnsupportedArgumentType { argument: "tableTypes", kind: "integer" })
    ));
}

#[test]
fn test_bound_arguments_from_row() {
    let op = Catalog::lookup("getBestRowIdentifier").unwrap();
    let row = vec![
        Value::string("orders"),
        Value::Integer(1),
        Value::string("Y"),
    ];
    let bindings = [
        FieldBinding::ProvideNull,
        FieldBinding::ProvideNull,
        FieldBinding::Index(0),
        FieldBinding::Index(1),
        FieldBinding::Index(2),
    ];
    let args = BoundArguments::from_row(op, &bindings, &row).unwrap();
    assert_eq!(args.len(), 5);
    assert_eq!(args.string(0).unwrap(), None);
    assert_eq!(args.string(2).unwrap(), Some("orders"));
    assert_eq!(args.integer(3).unwrap(), 1);
    assert!(args.boolean(4).unwrap());
    assert_eq!(
        args.to_string(),
        "getBestRowIdentifier(catalog=null, schema=null, table=\"orders\", scope=1, nullable=true)"
    );
}

#[test]
fn test_bound_arguments_count_and_nulls() {
    let op = Catalog::lookup("getTables").unwrap();
    assert!(matches!(
        BoundArguments::from_constants(op, &["".into()]),
        Err(StepError::ArgumentCountMismatch { expected: 4, actual: 1, .. })
    ));

    let args = BoundArguments::from_constants(
        op,
        &["".into(), "".into(), "%".into(), "TABLE,".into()],
    )
    .unwrap();
    assert_eq!(args.string_array(3).unwrap(), Some(vec!["TABLE".to_string()]));

    let op = Catalog::lookup("getBestRowIdentifier").unwrap();
    let args = BoundArguments::from_constants(
        op,
        &["".into(), "".into(), "t".into(), "".into(), "Y".into()],
    )
    .unwrap();
    assert!(matches!(
        args.integer(3),
        Err(StepError::NullArgument { argument: "scope", .. })
    ));
}
