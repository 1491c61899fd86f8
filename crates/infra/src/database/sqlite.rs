//! SQLite backend for the local cache
//!
//! `rusqlite` is synchronous, so every statement runs on the blocking pool
//! via `spawn_blocking`. `$N` placeholders are SQLite named parameters and
//! are bound by name. Writes open a transaction lazily; it stays open until
//! [`Session::commit`]. A failed write rolls the open transaction back.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rosterlink_common::storage::{Connector, Row, Rows, Session, SqlValue, StorageError, StorageResult};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, OpenFlags, Statement};
use tokio::task;
use tracing::debug;

use crate::errors::IntoStorageError;

/// Opens sessions on one SQLite file
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    async fn connect(&self) -> StorageResult<Box<dyn Session>> {
        let path = self.path.clone();
        let conn = task::spawn_blocking(move || open(&path)).await.map_err(map_join_error)??;
        debug!(path = %self.path.display(), "SQLite session opened");
        Ok(Box::new(SqliteSession { conn: Arc::new(Mutex::new(conn)) }))
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// One SQLite connection
pub struct SqliteSession {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSession {
    async fn run<T, F>(&self, f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard).map_err(IntoStorageError::into_storage)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl Session for SqliteSession {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> StorageResult<u64> {
        let sql = sql.to_string();
        let params = params.to_vec();

        let affected = self
            .run(move |conn| {
                if conn.is_autocommit() {
                    conn.execute_batch("BEGIN")?;
                }
                let result = conn.prepare(&sql).and_then(|mut stmt| {
                    bind_params(&mut stmt, &params)?;
                    stmt.raw_execute()
                });
                if result.is_err() && !conn.is_autocommit() {
                    if let Err(err) = conn.execute_batch("ROLLBACK") {
                        debug!(error = %err, "Rollback after failed statement did not complete");
                    }
                }
                result
            })
            .await?;

        Ok(affected as u64)
    }

    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> StorageResult<Rows> {
        let sql = sql.to_string();
        let params = params.to_vec();

        self.run(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            bind_params(&mut stmt, &params)?;
            let columns = stmt.column_count();

            let mut rows = stmt.raw_query();
            let mut collected = Vec::new();
            while let Some(row) = rows.next()? {
                let values = (0..columns)
                    .map(|index| row.get_ref(index).and_then(|value| decode(index, value)))
                    .collect::<Result<Vec<_>, _>>()?;
                collected.push(Row::new(values));
            }
            Ok(collected)
        })
        .await
    }

    async fn commit(&mut self) -> StorageResult<()> {
        self.run(|conn| if conn.is_autocommit() { Ok(()) } else { conn.execute_batch("COMMIT") })
            .await
    }

    async fn table_exists(&mut self, name: &str) -> StorageResult<bool> {
        let name = name.to_string();
        self.run(move |conn| {
            let mut stmt =
                conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
            stmt.exists([name])
        })
        .await
    }
}

// ============================================================================
// Helpers (synchronous)
// ============================================================================

fn open(path: &Path) -> StorageResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;

    let conn = Connection::open_with_flags(path, flags).map_err(|e| {
        StorageError::Connection(format!("failed to open {}: {e}", path.display()))
    })?;
    conn.busy_timeout(std::time::Duration::from_secs(5)).map_err(IntoStorageError::into_storage)?;
    Ok(conn)
}

/// Bind `$N` parameters by name; `$N` reads `params[N - 1]`.
fn bind_params(stmt: &mut Statement<'_>, params: &[SqlValue]) -> Result<(), rusqlite::Error> {
    for index in 1..=stmt.parameter_count() {
        let name = stmt.parameter_name(index).unwrap_or_default().to_string();
        let position = name
            .strip_prefix('$')
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| (1..=params.len()).contains(n))
            .ok_or_else(|| rusqlite::Error::InvalidParameterName(name.clone()))?;

        stmt.raw_bind_parameter(index, to_sqlite(&params[position - 1]))?;
    }
    Ok(())
}

fn to_sqlite(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Int(v) => Value::Integer(*v),
        SqlValue::Text(s) => Value::Text(s.clone()),
    }
}

fn decode(index: usize, value: ValueRef<'_>) -> Result<SqlValue, rusqlite::Error> {
    match value {
        ValueRef::Null => Ok(SqlValue::Null),
        ValueRef::Integer(v) => Ok(SqlValue::Int(v)),
        ValueRef::Real(v) => Ok(SqlValue::Text(v.to_string())),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| SqlValue::Text(s.to_string()))
            .map_err(rusqlite::Error::Utf8Error),
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            index,
            String::new(),
            rusqlite::types::Type::Blob,
        )),
    }
}

fn map_join_error(err: task::JoinError) -> StorageError {
    StorageError::Connection(format!("blocking database task failed: {err}"))
}
