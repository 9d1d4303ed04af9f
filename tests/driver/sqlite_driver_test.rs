//! SQLite metadata driver against a seeded database.

#[path = "../common/mod.rs"]
mod common;

use common::TestDb;
use metastep::driver::{Connection, Driver, DriverError, ResultSet, SqlType, SqliteDriver};
use metastep::row::Value;

fn connect(db: &TestDb) -> Box<dyn Connection> {
    SqliteDriver.connect(&db.url, None, None).unwrap()
}

/// Drain a result set into rows of the given 1-based columns.
fn collect(mut rs: Box<dyn ResultSet>, columns: &[usize]) -> Vec<Vec<Value>> {
    let mut rows = Vec::new();
    while rs.next().unwrap() {
        rows.push(columns.iter().map(|&c| rs.get(c).unwrap()).collect());
    }
    rs.close().unwrap();
    rows
}

fn strings(rows: &[Vec<Value>], idx: usize) -> Vec<String> {
    rows.iter().map(|r| r[idx].to_string()).collect()
}

#[test]
fn test_get_tables_all() {
    let db = TestDb::new("driver_tables_all");
    let conn = connect(&db);
    let rs = conn.metadata().unwrap().get_tables(None, None, None, None).unwrap();
    assert_eq!(rs.column_count(), 10);
    assert_eq!(rs.column_name(3).unwrap(), "TABLE_NAME");

    let rows = collect(rs, &[3, 4]);
    assert_eq!(
        strings(&rows, 0),
        vec!["audit_log", "customers", "order_lines", "orders", "big_orders"]
    );
    assert_eq!(strings(&rows, 1)[4], "VIEW");
}

#[test]
fn test_get_tables_pattern_and_types() {
    let db = TestDb::new("driver_tables_filter");
    let conn = connect(&db);
    let meta = conn.metadata().unwrap();

    let types = vec!["VIEW".to_string()];
    let rows = collect(meta.get_tables(None, None, Some("%orders"), Some(&types)).unwrap(), &[3]);
    assert_eq!(strings(&rows, 0), vec!["big_orders"]);

    let types = vec!["table".to_string()];
    let rows = collect(meta.get_tables(None, None, Some("%orders"), Some(&types)).unwrap(), &[3]);
    assert_eq!(strings(&rows, 0), vec!["orders"]);

    // `_` is a single-character wildcard unless escaped.
    let rows = collect(meta.get_tables(None, None, Some("order_"), None).unwrap(), &[3]);
    assert_eq!(strings(&rows, 0), vec!["orders"]);
    let rows = collect(meta.get_tables(None, None, Some("order\\_%"), None).unwrap(), &[3]);
    assert_eq!(strings(&rows, 0), vec!["order_lines"]);
}

#[test]
fn test_get_columns() {
    let db = TestDb::new("driver_columns");
    let conn = connect(&db);
    let rs = conn
        .metadata()
        .unwrap()
        .get_columns(None, None, Some("customers"), None)
        .unwrap();
    assert_eq!(rs.column_count(), 24);

    // COLUMN_NAME, DATA_TYPE, TYPE_NAME, COLUMN_SIZE, NULLABLE, ORDINAL_POSITION,
    // IS_NULLABLE, IS_AUTOINCREMENT
    let rows = collect(rs, &[4, 5, 6, 7, 11, 17, 18, 23]);
    assert_eq!(
        rows,
        vec![
            vec![
                Value::string("id"),
                Value::Integer(4),
                Value::string("INTEGER"),
                Value::Null,
                Value::Integer(1),
                Value::Integer(1),
                Value::string("YES"),
                Value::string("YES"),
            ],
            vec![
                Value::string("name"),
                Value::Integer(12),
                Value::string("VARCHAR(40)"),
                Value::Integer(40),
                Value::Integer(0),
                Value::Integer(2),
                Value::string("NO"),
                Value::string("NO"),
            ],
            vec![
                Value::string("email"),
                Value::Integer(12),
                Value::string("TEXT"),
                Value::Null,
                Value::Integer(1),
                Value::Integer(3),
                Value::string("YES"),
                Value::string("NO"),
            ],
        ]
    );
}

#[test]
fn test_get_columns_patterns_and_default() {
    let db = TestDb::new("driver_columns_pattern");
    let conn = connect(&db);
    let rs = conn
        .metadata()
        .unwrap()
        .get_columns(None, None, Some("ord%"), Some("%id"))
        .unwrap();
    let rows = collect(rs, &[3, 4]);
    assert_eq!(
        rows.iter()
            .map(|r| format!("{}.{}", r[0], r[1]))
            .collect::<Vec<_>>(),
        vec!["order_lines.order_id", "orders.id", "orders.customer_id"]
    );

    let rs = conn
        .metadata()
        .unwrap()
        .get_columns(None, None, Some("orders"), Some("placed_at"))
        .unwrap();
    let rows = collect(rs, &[13]);
    assert_eq!(rows, vec![vec![Value::string("'now'")]]);
}

#[test]
fn test_get_primary_keys_composite() {
    let db = TestDb::new("driver_pk");
    let conn = connect(&db);
    let rs = conn
        .metadata()
        .unwrap()
        .get_primary_keys(None, None, Some("order_lines"))
        .unwrap();
    let rows = collect(rs, &[3, 4, 5]);
    assert_eq!(
        rows,
        vec![
            vec![Value::string("order_lines"), Value::string("order_id"), Value::Integer(1)],
            vec![Value::string("order_lines"), Value::string("line_no"), Value::Integer(2)],
        ]
    );
}

#[test]
fn test_imported_and_exported_keys() {
    let db = TestDb::new("driver_fk");
    let conn = connect(&db);
    let meta = conn.metadata().unwrap();

    // PKTABLE_NAME, PKCOLUMN_NAME, FKTABLE_NAME, FKCOLUMN_NAME, KEY_SEQ, DELETE_RULE, DEFERRABILITY
    let cols = [3, 4, 7, 8, 9, 11, 14];
    let imported = collect(meta.get_imported_keys(None, None, Some("orders")).unwrap(), &cols);
    assert_eq!(
        imported,
        vec![vec![
            Value::string("customers"),
            Value::string("id"),
            Value::string("orders"),
            Value::string("customer_id"),
            Value::Integer(1),
            Value::Integer(0),
            Value::Integer(7),
        ]]
    );

    let exported = collect(meta.get_exported_keys(None, None, Some("orders")).unwrap(), &cols);
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0][2], Value::string("order_lines"));
    assert_eq!(exported[0][1], Value::string("id"));
    // NO ACTION
    assert_eq!(exported[0][5], Value::Integer(3));
}

#[test]
fn test_cross_reference() {
    let db = TestDb::new("driver_xref");
    let conn = connect(&db);
    let meta = conn.metadata().unwrap();

    let rows = collect(
        meta.get_cross_reference(None, None, Some("customers"), None, None, Some("orders"))
            .unwrap(),
        &[3, 7],
    );
    assert_eq!(rows, vec![vec![Value::string("customers"), Value::string("orders")]]);

    let rows = collect(
        meta.get_cross_reference(None, None, Some("customers"), None, None, Some("order_lines"))
            .unwrap(),
        &[3],
    );
    assert!(rows.is_empty());
}

#[test]
fn test_best_row_identifier() {
    let db = TestDb::new("driver_best_row");
    let conn = connect(&db);
    let meta = conn.metadata().unwrap();

    // SCOPE, COLUMN_NAME, COL_PSEUDO_COLUMN
    let rows = collect(
        meta.get_best_row_identifier(None, None, Some("orders"), 2, true)
            .unwrap(),
        &[1, 2, 8],
    );
    assert_eq!(
        rows,
        vec![vec![Value::Integer(2), Value::string("id"), Value::Integer(1)]]
    );

    let rows = collect(
        meta.get_best_row_identifier(None, None, Some("audit_log"), 0, false)
            .unwrap(),
        &[2, 8],
    );
    assert_eq!(rows, vec![vec![Value::string("ROWID"), Value::Integer(2)]]);

    let rows = collect(
        meta.get_best_row_identifier(None, None, Some("missing"), 0, false)
            .unwrap(),
        &[2],
    );
    assert!(rows.is_empty());
}

#[test]
fn test_type_info_reports_booleans_as_smallint() {
    let db = TestDb::new("driver_type_info");
    let conn = connect(&db);
    let mut rs = conn.metadata().unwrap().get_type_info().unwrap();
    assert_eq!(rs.column_count(), 18);
    assert_eq!(rs.column_name(8).unwrap(), "CASE_SENSITIVE");
    assert_eq!(rs.column_type(8).unwrap(), SqlType::SmallInt);

    let mut names = Vec::new();
    while rs.next().unwrap() {
        names.push(rs.get(1).unwrap().to_string());
        if rs.get(1).unwrap() == Value::string("TEXT") {
            assert_eq!(rs.get(8).unwrap(), Value::Integer(1));
            assert_eq!(rs.get(4).unwrap(), Value::string("'"));
        }
    }
    assert_eq!(names, vec!["NULL", "INTEGER", "REAL", "TEXT", "BLOB"]);
}

#[test]
fn test_empty_answers() {
    let db = TestDb::new("driver_empty");
    let conn = connect(&db);
    let meta = conn.metadata().unwrap();

    let rs = meta.get_schemas().unwrap();
    assert_eq!(rs.column_count(), 2);
    assert!(collect(rs, &[1]).is_empty());
    assert!(collect(meta.get_catalogs().unwrap(), &[1]).is_empty());
    assert!(collect(
        meta.get_table_privileges(None, None, Some("%")).unwrap(),
        &[1]
    )
    .is_empty());

    let types = collect(meta.get_table_types().unwrap(), &[1]);
    assert_eq!(strings(&types, 0), vec!["TABLE", "VIEW"]);
}

#[test]
fn test_closed_connection() {
    let db = TestDb::new("driver_closed");
    let mut conn = connect(&db);
    conn.close().unwrap();
    assert!(conn.is_closed());
    assert!(matches!(conn.metadata(), Err(DriverError::ConnectionClosed)));
}

#[test]
fn test_unopenable_file() {
    let err = SqliteDriver
        .connect("sqlite:/nonexistent-dir/metastep/app.db", None, None)
        .err()
        .unwrap();
    assert!(matches!(err, DriverError::ConnectionFailed(_)));
}
