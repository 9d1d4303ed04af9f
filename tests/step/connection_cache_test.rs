//! Connection resolution and caching per source mode.

#[path = "../common/mod.rs"]
mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{count, registry_with, CountingDriver, TestDb};
use metastep::config::{ConnectionSettings, ConnectionSource, Variables};
use metastep::connection::{ConnectionContext, ConnectionResolver, SettingsCatalog};
use metastep::driver::{DriverError, ResultSet};
use metastep::fields::ConnectionFields;
use metastep::row::Value;
use metastep::StepError;

const JDBC_FIELDS: ConnectionFields = ConnectionFields::Jdbc {
    driver: 0,
    url: 1,
    user: 2,
    password: 3,
};

fn jdbc_fields_source() -> ConnectionSource {
    ConnectionSource::JdbcFields {
        driver_field: "drv".into(),
        url_field: "url".into(),
        user_field: "usr".into(),
        password_field: "pwd".into(),
    }
}

fn jdbc_row(url: &str, user: Option<&str>) -> Vec<Value> {
    vec![
        Value::string("sqlite"),
        Value::string(url),
        Value::from(user),
        Value::Null,
    ]
}

fn named_context(driver: CountingDriver, dbs: &[(&str, &TestDb)]) -> ConnectionContext {
    let drivers = registry_with(driver);
    let mut catalog = SettingsCatalog::new(HashMap::new(), drivers.clone(), Variables::default());
    for (name, db) in dbs {
        catalog.insert(*name, ConnectionSettings::new("sqlite", db.url.clone()));
    }
    ConnectionContext::new(Arc::new(catalog), drivers, Variables::default())
}

#[test]
fn test_jdbc_fields_same_tuple_opens_once() {
    let db = TestDb::new("cache_jdbc_same");
    let driver = CountingDriver::new();
    let (connects, closes) = driver.counters();
    let context = ConnectionContext::with_drivers(registry_with(driver));

    let mut resolver = ConnectionResolver::new(jdbc_fields_source(), context);
    resolver.open().unwrap();
    assert_eq!(count(&connects), 0);

    let row = jdbc_row(&db.url, None);
    for _ in 0..3 {
        let conn = resolver.resolve(&JDBC_FIELDS, &row).unwrap();
        let mut rs = conn.metadata().unwrap().get_table_types().unwrap();
        assert!(rs.next().unwrap());
    }
    assert_eq!(count(&connects), 1);
    assert_eq!(resolver.cached_connections(), 1);

    assert_eq!(resolver.close_all(), 0);
    assert_eq!(count(&closes), 1);
    assert_eq!(resolver.cached_connections(), 0);
}

#[test]
fn test_jdbc_fields_distinct_tuples_open_distinct_connections() {
    let db = TestDb::new("cache_jdbc_distinct");
    let other = TestDb::new("cache_jdbc_distinct_other");
    let driver = CountingDriver::new();
    let (connects, closes) = driver.counters();
    let mut resolver = ConnectionResolver::new(
        jdbc_fields_source(),
        ConnectionContext::with_drivers(registry_with(driver)),
    );

    resolver.resolve(&JDBC_FIELDS, &jdbc_row(&db.url, None)).unwrap();
    resolver.resolve(&JDBC_FIELDS, &jdbc_row(&db.url, Some("alice"))).unwrap();
    resolver.resolve(&JDBC_FIELDS, &jdbc_row(&other.url, None)).unwrap();
    resolver.resolve(&JDBC_FIELDS, &jdbc_row(&db.url, Some("alice"))).unwrap();
    assert_eq!(count(&connects), 3);
    assert_eq!(resolver.cached_connections(), 3);

    assert_eq!(resolver.close_all(), 0);
    assert_eq!(count(&closes), 3);
}

#[test]
fn test_jdbc_fields_null_url_is_rejected() {
    let mut resolver = ConnectionResolver::new(
        jdbc_fields_source(),
        ConnectionContext::with_drivers(registry_with(CountingDriver::new())),
    );
    let row = vec![Value::string("sqlite"), Value::Null, Value::Null, Value::Null];
    match resolver.resolve(&JDBC_FIELDS, &row) {
        Err(StepError::MissingConnectionValue { what, field }) => {
            assert_eq!(what, "url");
            assert_eq!(field, "url");
        }
        Err(other) => panic!("unexpected error {:?}", other),
        Ok(_) => panic!("expected an error"),
    }
    assert_eq!(resolver.cached_connections(), 0);
}

#[test]
fn test_failed_close_does_not_stop_cleanup() {
    let db = TestDb::new("cache_close_ok");
    let stuck = TestDb::new("cache_close_stuck");
    let driver = CountingDriver::failing_close_for(stuck.url.clone());
    let (connects, closes) = driver.counters();
    let mut resolver = ConnectionResolver::new(
        jdbc_fields_source(),
        ConnectionContext::with_drivers(registry_with(driver)),
    );

    resolver.resolve(&JDBC_FIELDS, &jdbc_row(&stuck.url, None)).unwrap();
    resolver.resolve(&JDBC_FIELDS, &jdbc_row(&db.url, None)).unwrap();
    assert_eq!(count(&connects), 2);

    assert_eq!(resolver.close_all(), 1);
    assert_eq!(count(&closes), 1);
    assert_eq!(resolver.cached_connections(), 0);
    assert_eq!(resolver.close_all(), 0);
}

#[test]
fn test_connection_field_caches_by_name() {
    let first = TestDb::new("cache_named_first");
    let second = TestDb::new("cache_named_second");
    let driver = CountingDriver::new();
    let (connects, closes) = driver.counters();
    let context = named_context(driver, &[("first", &first), ("second", &second)]);

    let mut resolver = ConnectionResolver::new(
        ConnectionSource::ConnectionField { field: "db".into() },
        context,
    );
    resolver.open().unwrap();
    assert_eq!(count(&connects), 0);

    let fields = ConnectionFields::Name(0);
    for name in ["first", "second", "first", "first", "second"] {
        resolver.resolve(&fields, &[Value::string(name)]).unwrap();
    }
    assert_eq!(count(&connects), 2);
    assert_eq!(resolver.cached_connections(), 2);

    assert!(matches!(
        resolver.resolve(&fields, &[Value::string("third")]),
        Err(StepError::ConnectionNotFound(name)) if name == "third"
    ));
    assert!(matches!(
        resolver.resolve(&fields, &[Value::Null]),
        Err(StepError::MissingConnectionValue { what: "name", .. })
    ));

    assert_eq!(resolver.close_all(), 0);
    assert_eq!(count(&closes), 2);
}

#[test]
fn test_named_connection_connects_at_open() {
    let db = TestDb::new("cache_named_open");
    let driver = CountingDriver::new();
    let (connects, closes) = driver.counters();
    let context = named_context(driver, &[("warehouse", &db)]);

    let mut resolver = ConnectionResolver::new(
        ConnectionSource::Connection {
            name: "warehouse".into(),
        },
        context,
    );
    assert!(matches!(
        resolver.resolve(&ConnectionFields::None, &[]),
        Err(StepError::NotOpen)
    ));

    resolver.open().unwrap();
    resolver.open().unwrap();
    assert_eq!(count(&connects), 1);
    for _ in 0..2 {
        resolver.resolve(&ConnectionFields::None, &[]).unwrap();
    }
    assert_eq!(count(&connects), 1);

    assert_eq!(resolver.close_all(), 0);
    assert_eq!(count(&closes), 1);
}

#[test]
fn test_unknown_named_connection_fails_open() {
    let mut resolver = ConnectionResolver::new(
        ConnectionSource::Connection {
            name: "nowhere".into(),
        },
        named_context(CountingDriver::new(), &[]),
    );
    assert!(matches!(
        resolver.open(),
        Err(StepError::ConnectionNotFound(name)) if name == "nowhere"
    ));
}

#[test]
fn test_direct_jdbc_with_unknown_driver_fails_open() {
    let mut resolver = ConnectionResolver::new(
        ConnectionSource::Jdbc {
            driver: "postgres".into(),
            url: "jdbc:postgresql://localhost/db".into(),
            user: "app".into(),
            password: "secret".into(),
        },
        ConnectionContext::with_drivers(registry_with(CountingDriver::new())),
    );
    assert!(matches!(
        resolver.open(),
        Err(StepError::Driver(DriverError::DriverNotFound(id))) if id == "postgres"
    ));
    assert_eq!(resolver.cached_connections(), 0);
}
