#![allow(dead_code)]

//! In-memory stand-in for the ProxySQL admin interface.
//!
//! ProxySQL keeps its admin tables in SQLite, so the fixture runs the real
//! statements against an in-memory SQLite database carrying the same table
//! definition, and records what was executed.

use galera_hostgroups_core::{validate, ConfigCategory, HostgroupMapping, RawMapping, Row, Storage, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};

/// `mysql_galera_hostgroups` as declared by the ProxySQL admin module.
pub const SCHEMA: &str = "CREATE TABLE mysql_galera_hostgroups (
    writer_hostgroup INT CHECK (writer_hostgroup>=0) NOT NULL PRIMARY KEY,
    backup_writer_hostgroup INT CHECK (backup_writer_hostgroup>=0 AND backup_writer_hostgroup<>writer_hostgroup) NOT NULL,
    reader_hostgroup INT NOT NULL CHECK (reader_hostgroup<>writer_hostgroup AND backup_writer_hostgroup<>reader_hostgroup AND reader_hostgroup>0),
    offline_hostgroup INT NOT NULL CHECK (offline_hostgroup<>writer_hostgroup AND offline_hostgroup<>reader_hostgroup AND backup_writer_hostgroup<>offline_hostgroup AND offline_hostgroup>=0),
    active INT CHECK (active IN (0,1)) NOT NULL DEFAULT 1,
    max_writers INT NOT NULL CHECK (max_writers >= 0) DEFAULT 1,
    writer_is_also_reader INT CHECK (writer_is_also_reader IN (0,1,2)) NOT NULL DEFAULT 0,
    max_transactions_behind INT CHECK (max_transactions_behind>=0) NOT NULL DEFAULT 0,
    comment VARCHAR,
    UNIQUE (reader_hostgroup),
    UNIQUE (offline_hostgroup),
    UNIQUE (backup_writer_hostgroup))";

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("injected failure for `{0}`")]
    Injected(String),
}

pub struct SqliteAdmin {
    conn: Connection,
    /// Report every non-NULL value as text, like the admin interface does.
    pub text_results: bool,
    /// Fail any statement or command containing this text.
    pub fail_on: Option<&'static str>,
    /// Statements run through [`Storage::execute`], in order.
    pub executed: Vec<String>,
    pub saved: Vec<ConfigCategory>,
    pub loaded: Vec<ConfigCategory>,
}

impl SqliteAdmin {
    pub fn new() -> Self {
        let conn = Connection::open_in_memory().expect("open in-memory database");
        conn.execute_batch(SCHEMA).expect("create admin table");
        Self {
            conn,
            text_results: false,
            fail_on: None,
            executed: Vec::new(),
            saved: Vec::new(),
            loaded: Vec::new(),
        }
    }

    /// Admin table of a server version that has the `check_type` column.
    pub fn with_check_type_column() -> Self {
        let admin = Self::new();
        admin
            .conn
            .execute_batch("ALTER TABLE mysql_galera_hostgroups ADD COLUMN check_type VARCHAR")
            .expect("add check_type column");
        admin
    }

    /// Insert a row directly, bypassing the reconciler and the statement log.
    pub fn seed(&self, raw: &RawMapping) {
        self.conn
            .execute(
                "INSERT INTO mysql_galera_hostgroups VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    raw.writer_hostgroup,
                    raw.backup_writer_hostgroup,
                    raw.reader_hostgroup,
                    raw.offline_hostgroup,
                    raw.active,
                    raw.max_writers,
                    raw.writer_is_also_reader,
                    raw.max_transactions_behind,
                    raw.comment,
                ],
            )
            .expect("seed row");
    }

    /// Every cell of the table rendered as text, ordered by key.
    pub fn dump(&self) -> Vec<Vec<Option<String>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM mysql_galera_hostgroups ORDER BY writer_hostgroup")
            .expect("prepare dump");
        let width = stmt.column_count();
        let mut rows = stmt.query([]).expect("query dump");
        let mut out = Vec::new();
        while let Some(row) = rows.next().expect("read dump") {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(match row.get_ref(i).expect("read cell") {
                    ValueRef::Null => None,
                    ValueRef::Integer(v) => Some(v.to_string()),
                    ValueRef::Real(v) => Some(v.to_string()),
                    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                        Some(String::from_utf8_lossy(bytes).into_owned())
                    }
                });
            }
            out.push(cells);
        }
        out
    }

    pub fn check_type(&self, key: u32) -> Option<String> {
        self.conn
            .query_row(
                "SELECT check_type FROM mysql_galera_hostgroups WHERE writer_hostgroup = ?1",
                [key],
                |row| row.get(0),
            )
            .expect("read check_type")
    }

    pub fn updates(&self) -> Vec<&str> {
        self.executed
            .iter()
            .filter(|sql| sql.starts_with("UPDATE"))
            .map(String::as_str)
            .collect()
    }

    fn injected(&self, sql: &str) -> Result<(), FixtureError> {
        match self.fail_on {
            Some(pattern) if sql.contains(pattern) => Err(FixtureError::Injected(sql.to_owned())),
            _ => Ok(()),
        }
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Int(v) => SqlValue::Integer(*v),
        Value::Text(text) => SqlValue::Text(text.clone()),
    }
}

impl Storage for SqliteAdmin {
    type Error = FixtureError;

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Self::Error> {
        self.injected(sql)?;
        let text = self.text_results;
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();
        let mut rows = stmt.query(params_from_iter(params.iter().map(to_sql)))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut columns = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let value = match row.get_ref(i)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(v) if text => Value::Text(v.to_string()),
                    ValueRef::Integer(v) => Value::Int(v),
                    ValueRef::Real(v) => Value::Text(v.to_string()),
                    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                        Value::Text(String::from_utf8_lossy(bytes).into_owned())
                    }
                };
                columns.push((name.clone(), value));
            }
            out.push(columns.into_iter().collect());
        }
        Ok(out)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<(), Self::Error> {
        self.injected(sql)?;
        self.conn
            .execute(sql, params_from_iter(params.iter().map(to_sql)))?;
        self.executed.push(sql.to_owned());
        Ok(())
    }

    fn persist(&mut self, category: ConfigCategory) -> Result<(), Self::Error> {
        self.injected(&format!("SAVE {category} TO DISK"))?;
        self.saved.push(category);
        Ok(())
    }

    fn activate(&mut self, category: ConfigCategory) -> Result<(), Self::Error> {
        self.injected(&format!("LOAD {category} TO RUNTIME"))?;
        self.loaded.push(category);
        Ok(())
    }
}

/// The example mapping: writer 10, backup writer 11, reader 12, offline 13.
pub fn raw(writer: i64) -> RawMapping {
    RawMapping {
        writer_hostgroup: writer,
        backup_writer_hostgroup: writer + 1,
        reader_hostgroup: writer + 2,
        offline_hostgroup: writer + 3,
        active: 1,
        max_writers: 2,
        writer_is_also_reader: 0,
        max_transactions_behind: 0,
        comment: "prod".to_owned(),
    }
}

pub fn desired(raw: &RawMapping) -> HostgroupMapping {
    validate(raw).expect("valid mapping")
}
