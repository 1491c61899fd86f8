//! Backend traits
//!
//! A [`Connector`] knows how to open a connection; the [`Session`] it
//! returns runs statements on that one connection. Both use `$1`, `$2`, ...
//! placeholders.

use async_trait::async_trait;

use super::error::StorageResult;
use super::types::{Rows, SqlValue};

/// One live database connection
///
/// Mutating statements run inside an implicit transaction that stays open
/// until [`Session::commit`]. Implementations report a dropped server
/// connection as [`StorageError::ConnectionLost`](super::StorageError).
#[async_trait]
pub trait Session: Send {
    /// Execute a statement that returns no rows; returns the affected count.
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> StorageResult<u64>;

    /// Run a query and collect every row.
    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> StorageResult<Rows>;

    /// Commit the open transaction, if any.
    async fn commit(&mut self) -> StorageResult<()>;

    /// Whether a table with this name exists in the current database.
    async fn table_exists(&mut self, name: &str) -> StorageResult<bool>;
}

/// Opens sessions for one backend
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establish a new session.
    async fn connect(&self) -> StorageResult<Box<dyn Session>>;

    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;
}
