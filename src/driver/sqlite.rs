//! SQLite metadata driver.
//!
//! Answers the catalog operations from `sqlite_master` and the
//! `table_info` / `foreign_key_list` pragmas. SQLite has neither catalogs nor
//! schemas, so those arguments are accepted and ignored, and the
//! corresponding result columns are null.
//!
//! Accepted URLs:
//!
//! ```text
//! sqlite::memory:                              private in-memory database
//! sqlite:./data/app.db                         database file
//! jdbc:sqlite:./data/app.db                    same, JDBC spelling
//! sqlite:file:shared?mode=memory&cache=shared  SQLite URI filename
//! ```

use rusqlite::{params, OptionalExtension};

use super::error::{DriverError, DriverResult};
use super::registry::Driver;
use super::rowset::RowSet;
use super::types::SqlType;
use super::{Connection, DatabaseMetadata, MetadataCursor};
use crate::catalog::Operation;
use crate::row::{Value, ValueType};

/// `DatabaseMetaData.columnNoNulls` / `columnNullable`.
const COLUMN_NO_NULLS: i64 = 0;
const COLUMN_NULLABLE: i64 = 1;

const BEST_ROW_NOT_PSEUDO: i64 = 1;
const BEST_ROW_PSEUDO: i64 = 2;

const IMPORTED_KEY_NOT_DEFERRABLE: i64 = 7;

const TYPE_NULLABLE: i64 = 1;
const TYPE_SEARCHABLE: i64 = 3;

/// Driver for SQLite databases, registered as `sqlite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDriver;

impl SqliteDriver {
    fn target(url: &str) -> Option<&str> {
        url.strip_prefix("jdbc:sqlite:")
            .or_else(|| url.strip_prefix("sqlite:"))
    }
}

impl Driver for SqliteDriver {
    fn accepts_url(&self, url: &str) -> bool {
        Self::target(url).is_some()
    }

    fn connect(
        &self,
        url: &str,
        _user: Option<&str>,
        _password: Option<&str>,
    ) -> DriverResult<Box<dyn Connection>> {
        let target = Self::target(url).ok_or_else(|| DriverError::UnsupportedUrl {
            driver: "sqlite".to_string(),
            url: url.to_string(),
        })?;

        let conn = if target.is_empty() || target == ":memory:" {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open(target)
        }
        .map_err(|e| DriverError::ConnectionFailed(format!("{}: {}", url, e)))?;

        Ok(Box::new(SqliteConnection::new(conn)))
    }
}

/// An open SQLite connection.
pub struct SqliteConnection {
    conn: Option<rusqlite::Connection>,
}

impl SqliteConnection {
    /// Wrap an existing rusqlite connection.
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self { conn: Some(conn) }
    }

    fn conn(&self) -> DriverResult<&rusqlite::Connection> {
        self.conn.as_ref().ok_or(DriverError::ConnectionClosed)
    }

    /// Tables and views whose name matches a LIKE pattern, ordered by type and name.
    fn tables(&self, name_pattern: Option<&str>) -> DriverResult<Vec<TableEntry>> {
        let mut stmt = self.conn()?.prepare(
            "SELECT name, type, sql FROM sqlite_master
             WHERE type IN ('table', 'view')
               AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'
               AND name LIKE ?1 ESCAPE '\\'
             ORDER BY type, name",
        )?;

        let tables = stmt
            .query_map(params![name_pattern.unwrap_or("%")], |row| {
                let kind: String = row.get(1)?;
                Ok(TableEntry {
                    name: row.get(0)?,
                    table_type: if kind == "view" { "VIEW" } else { "TABLE" },
                    sql: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tables)
    }

    /// A single table by exact (case-insensitive) name.
    fn table(&self, name: &str) -> DriverResult<Option<TableEntry>> {
        let entry = self
            .conn()?
            .query_row(
                "SELECT name, type, sql FROM sqlite_master
                 WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
                params![name],
                |row| {
                    let kind: String = row.get(1)?;
                    Ok(TableEntry {
                        name: row.get(0)?,
                        table_type: if kind == "view" { "VIEW" } else { "TABLE" },
                        sql: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    fn columns(&self, table: &str, name_pattern: Option<&str>) -> DriverResult<Vec<ColumnEntry>> {
        let mut stmt = self.conn()?.prepare(
            "SELECT cid, name, type, \"notnull\", dflt_value, pk
             FROM pragma_table_info(?1)
             WHERE name LIKE ?2 ESCAPE '\\'
             ORDER BY cid",
        )?;

        let columns = stmt
            .query_map(params![table, name_pattern.unwrap_or("%")], |row| {
                Ok(ColumnEntry {
                    cid: row.get(0)?,
                    name: row.get(1)?,
                    declared_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    not_null: row.get::<_, i64>(3)? != 0,
                    default_value: row.get(4)?,
                    pk: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(columns)
    }

    fn primary_key(&self, table: &str) -> DriverResult<Vec<ColumnEntry>> {
        let mut pk: Vec<ColumnEntry> = self
            .columns(table, None)?
            .into_iter()
            .filter(|c| c.pk > 0)
            .collect();
        pk.sort_by_key(|c| c.pk);
        Ok(pk)
    }

    /// Foreign-key rows (in `getImportedKeys` layout) declared on `table`.
    fn foreign_keys(&self, table: &TableEntry) -> DriverResult<Vec<Vec<Value>>> {
        let mut stmt = self.conn()?.prepare(
            "SELECT seq, \"table\", \"from\", \"to\", on_update, on_delete
             FROM pragma_foreign_key_list(?1)
             ORDER BY id, seq",
        )?;

        let entries = stmt
            .query_map(params![table.name], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::with_capacity(entries.len());
        for (seq, parent, from, to, on_update, on_delete) in entries {
            // A missing target column means "the parent's primary key".
            let pk_column = match to {
                Some(column) => Some(column),
                None => self
                    .primary_key(&parent)?
                    .into_iter()
                    .nth(seq as usize)
                    .map(|c| c.name),
            };
            rows.push(vec![
                Value::Null,
                Value::Null,
                Value::String(parent),
                Value::from(pk_column),
                Value::Null,
                Value::Null,
                Value::string(&table.name),
                Value::String(from),
                Value::Integer(seq + 1),
                Value::Integer(key_rule(&on_update)),
                Value::Integer(key_rule(&on_delete)),
                Value::Null,
                Value::Null,
                Value::Integer(IMPORTED_KEY_NOT_DEFERRABLE),
            ]);
        }
        Ok(rows)
    }

    fn all_foreign_keys(&self) -> DriverResult<Vec<Vec<Value>>> {
        let mut rows = Vec::new();
        for table in self.tables(None)? {
            rows.extend(self.foreign_keys(&table)?);
        }
        Ok(rows)
    }
}

impl Connection for SqliteConnection {
    fn metadata(&self) -> DriverResult<&dyn DatabaseMetadata> {
        self.conn()?;
        Ok(self)
    }

    fn close(&mut self) -> DriverResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| DriverError::Sqlite(e))?;
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.conn.is_none()
    }
}

impl DatabaseMetadata for SqliteConnection {
    fn get_catalogs(&self) -> MetadataCursor {
        empty(Operation::GetCatalogs)
    }

    fn get_best_row_identifier(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
        scope: i32,
        _nullable: bool,
    ) -> MetadataCursor {
        let mut rs = RowSet::new(layout(Operation::GetBestRowIdentifier));
        let Some(entry) = table.map(|t| self.table(t)).transpose()?.flatten() else {
            return Ok(Box::new(rs));
        };

        let pk = self.primary_key(&entry.name)?;
        if pk.is_empty() {
            if !entry.is_without_rowid() {
                rs.push(vec![
                    Value::Integer(scope.into()),
                    Value::string("ROWID"),
                    Value::Integer(SqlType::Integer.code().into()),
                    Value::string("INTEGER"),
                    Value::Null,
                    Value::Null,
                    Value::Null,
                    Value::Integer(BEST_ROW_PSEUDO),
                ]);
            }
        } else {
            for column in pk {
                rs.push(vec![
                    Value::Integer(scope.into()),
                    Value::string(&column.name),
                    Value::Integer(column.sql_type().code().into()),
                    Value::string(&column.declared_type),
                    Value::from(declared_size(&column.declared_type)),
                    Value::Null,
                    Value::Null,
                    Value::Integer(BEST_ROW_NOT_PSEUDO),
                ]);
            }
        }
        Ok(Box::new(rs))
    }

    fn get_column_privileges(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        _table: Option<&str>,
        _column_name_pattern: Option<&str>,
    ) -> MetadataCursor {
        empty(Operation::GetColumnPrivileges)
    }

    fn get_columns(
        &self,
        _catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        column_name_pattern: Option<&str>,
    ) -> MetadataCursor {
        let mut tables = self.tables(table_name_pattern)?;
        tables.sort_by(|a, b| a.name.cmp(&b.name));

        let mut rs = RowSet::new(layout(Operation::GetColumns));
        for table in &tables {
            let autoincrement = table.is_autoincrement();
            for column in self.columns(&table.name, column_name_pattern)? {
                let is_autoincrement = autoincrement && column.pk == 1;
                rs.push(vec![
                    Value::Null,
                    Value::Null,
                    Value::string(&table.name),
                    Value::string(&column.name),
                    Value::Integer(column.sql_type().code().into()),
                    Value::string(&column.declared_type),
                    Value::from(declared_size(&column.declared_type)),
                    Value::Null,
                    Value::Null,
                    Value::Integer(10),
                    Value::Integer(if column.not_null {
                        COLUMN_NO_NULLS
                    } else {
                        COLUMN_NULLABLE
                    }),
                    Value::Null,
                    Value::from(column.default_value.clone()),
                    Value::Null,
                    Value::Null,
                    Value::Null,
                    Value::Integer(column.cid + 1),
                    Value::string(if column.not_null { "NO" } else { "YES" }),
                    Value::Null,
                    Value::Null,
                    Value::Null,
                    Value::Null,
                    Value::string(if is_autoincrement { "YES" } else { "NO" }),
                    Value::string("NO"),
                ]);
            }
        }
        Ok(Box::new(rs))
    }

    fn get_cross_reference(
        &self,
        _parent_catalog: Option<&str>,
        _parent_schema: Option<&str>,
        parent_table: Option<&str>,
        _foreign_catalog: Option<&str>,
        _foreign_schema: Option<&str>,
        foreign_table: Option<&str>,
    ) -> MetadataCursor {
        let mut rs = RowSet::new(layout(Operation::GetCrossReference));
        let (Some(parent), Some(foreign)) = (parent_table, foreign_table) else {
            return Ok(Box::new(rs));
        };
        if let Some(entry) = self.table(foreign)? {
            for row in self.foreign_keys(&entry)? {
                if text(&row, 2).eq_ignore_ascii_case(parent) {
                    rs.push(row);
                }
            }
        }
        Ok(Box::new(rs))
    }

    fn get_exported_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
    ) -> MetadataCursor {
        let mut rows: Vec<Vec<Value>> = match table {
            Some(parent) => self
                .all_foreign_keys()?
                .into_iter()
                .filter(|row| text(row, 2).eq_ignore_ascii_case(parent))
                .collect(),
            None => Vec::new(),
        };
        rows.sort_by(|a, b| (text(a, 6), int(a, 8)).cmp(&(text(b, 6), int(b, 8))));
        Ok(Box::new(RowSet::with_rows(
            layout(Operation::GetExportedKeys),
            rows,
        )))
    }

    fn get_imported_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
    ) -> MetadataCursor {
        let mut rows = match table.map(|t| self.table(t)).transpose()?.flatten() {
            Some(entry) => self.foreign_keys(&entry)?,
            None => Vec::new(),
        };
        rows.sort_by(|a, b| (text(a, 2), int(a, 8)).cmp(&(text(b, 2), int(b, 8))));
        Ok(Box::new(RowSet::with_rows(
            layout(Operation::GetImportedKeys),
            rows,
        )))
    }

    fn get_primary_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
    ) -> MetadataCursor {
        let mut rs = RowSet::new(layout(Operation::GetPrimaryKeys));
        if let Some(entry) = table.map(|t| self.table(t)).transpose()?.flatten() {
            for column in self.primary_key(&entry.name)? {
                rs.push(vec![
                    Value::Null,
                    Value::Null,
                    Value::string(&entry.name),
                    Value::string(&column.name),
                    Value::Integer(column.pk),
                    Value::Null,
                ]);
            }
        }
        Ok(Box::new(rs))
    }

    fn get_schemas(&self) -> MetadataCursor {
        empty(Operation::GetSchemas)
    }

    fn get_table_privileges(
        &self,
        _catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        _table_name_pattern: Option<&str>,
    ) -> MetadataCursor {
        empty(Operation::GetTablePrivileges)
    }

    fn get_table_types(&self) -> MetadataCursor {
        Ok(Box::new(RowSet::with_rows(
            layout(Operation::GetTableTypes),
            vec![vec![Value::string("TABLE")], vec![Value::string("VIEW")]],
        )))
    }

    fn get_tables(
        &self,
        _catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        types: Option<&[String]>,
    ) -> MetadataCursor {
        let mut rs = RowSet::new(layout(Operation::GetTables));
        for table in self.tables(table_name_pattern)? {
            if let Some(types) = types {
                if !types.iter().any(|t| t.eq_ignore_ascii_case(table.table_type)) {
                    continue;
                }
            }
            rs.push(vec![
                Value::Null,
                Value::Null,
                Value::String(table.name),
                Value::string(table.table_type),
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
            ]);
        }
        Ok(Box::new(rs))
    }

    fn get_type_info(&self) -> MetadataCursor {
        let mut rs = RowSet::new(layout(Operation::GetTypeInfo));
        let types = [
            ("NULL", SqlType::Null),
            ("INTEGER", SqlType::Integer),
            ("REAL", SqlType::Real),
            ("TEXT", SqlType::Varchar),
            ("BLOB", SqlType::Blob),
        ];
        for (name, sql_type) in types {
            let (prefix, suffix) = match sql_type {
                SqlType::Varchar => (Some("'"), Some("'")),
                SqlType::Blob => (Some("X'"), Some("'")),
                _ => (None, None),
            };
            let numeric = matches!(sql_type, SqlType::Integer | SqlType::Real);
            rs.push(vec![
                Value::string(name),
                Value::Integer(sql_type.code().into()),
                Value::Null,
                Value::from(prefix),
                Value::from(suffix),
                Value::Null,
                Value::Integer(TYPE_NULLABLE),
                flag(sql_type == SqlType::Varchar),
                Value::Integer(TYPE_SEARCHABLE),
                flag(false),
                flag(false),
                flag(sql_type == SqlType::Integer),
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                if numeric { Value::Integer(10) } else { Value::Null },
            ]);
        }
        Ok(Box::new(rs))
    }

    fn get_version_columns(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        _table: Option<&str>,
    ) -> MetadataCursor {
        empty(Operation::GetVersionColumns)
    }
}

struct TableEntry {
    name: String,
    table_type: &'static str,
    sql: Option<String>,
}

impl TableEntry {
    fn ddl_contains(&self, keyword: &str) -> bool {
        self.sql
            .as_deref()
            .is_some_and(|sql| sql.to_ascii_uppercase().contains(keyword))
    }

    fn is_autoincrement(&self) -> bool {
        self.ddl_contains("AUTOINCREMENT")
    }

    fn is_without_rowid(&self) -> bool {
        self.ddl_contains("WITHOUT ROWID")
    }
}

struct ColumnEntry {
    cid: i64,
    name: String,
    declared_type: String,
    not_null: bool,
    default_value: Option<String>,
    pk: i64,
}

impl ColumnEntry {
    fn sql_type(&self) -> SqlType {
        SqlType::from_declared(&self.declared_type)
    }
}

/// Result columns for an operation, as SQLite reports them.
///
/// SQLite has no boolean storage class, so boolean columns come back as
/// `SMALLINT` 0/1.
fn layout(operation: Operation) -> Vec<(String, SqlType)> {
    operation
        .descriptor()
        .columns
        .iter()
        .map(|c| {
            let sql_type = match c.value_type {
                ValueType::String => SqlType::Varchar,
                ValueType::Integer => SqlType::Integer,
                ValueType::Boolean => SqlType::SmallInt,
                ValueType::Number => SqlType::Double,
            };
            (c.name.to_string(), sql_type)
        })
        .collect()
}

fn empty(operation: Operation) -> MetadataCursor {
    Ok(Box::new(RowSet::new(layout(operation))))
}

fn flag(b: bool) -> Value {
    Value::Integer(i64::from(b))
}

fn text(row: &[Value], idx: usize) -> &str {
    row.get(idx).and_then(Value::as_str).unwrap_or_default()
}

fn int(row: &[Value], idx: usize) -> i64 {
    row.get(idx).and_then(Value::as_i64).unwrap_or_default()
}

/// `DatabaseMetaData.importedKey*` code for an SQLite action.
fn key_rule(action: &str) -> i64 {
    match action.to_ascii_uppercase().as_str() {
        "CASCADE" => 0,
        "RESTRICT" => 1,
        "SET NULL" => 2,
        "SET DEFAULT" => 4,
        _ => 3,
    }
}

/// Size from a declared type such as `VARCHAR(20)` or `DECIMAL(10,2)`.
fn declared_size(declared: &str) -> Option<i64> {
    let start = declared.find('(')? + 1;
    let digits: String = declared[start..]
        .chars()
        .skip_while(|c| c.is_whitespace())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
