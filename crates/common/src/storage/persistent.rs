//! Reconnecting connection handle
//!
//! The server may silently drop an idle connection. Every operation on a
//! [`PersistentConnection`] either succeeds on the existing session or,
//! when the session reports [`StorageError::ConnectionLost`], re-establishes
//! the session exactly once and retries the same operation once. The whole
//! sequence runs under one async lock.
//!
//! Uncommitted writes of a lost session are gone after the reconnect; only
//! the statement that observed the loss is replayed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::error::{StorageError, StorageResult};
use super::traits::{Connector, Session};
use super::types::{validate_identifier, Rows, SqlValue};

type SessionSlot = Option<Box<dyn Session>>;

/// Run `$call` against the live session, reconnecting once on connection loss.
macro_rules! with_reconnect {
    ($self:ident, $session:ident => $call:expr) => {{
        let mut guard = $self.session.lock().await;
        let $session = $self.live_session(&mut guard).await?;
        match $call.await {
            Err(err) if err.is_connection_lost() => {
                let $session = $self.reconnect(&mut guard, &err).await?;
                let retried = $call.await;
                if retried.as_ref().is_err_and(StorageError::is_connection_lost) {
                    *guard = None;
                }
                retried
            }
            other => other,
        }
    }};
}

/// Shared, self-healing database handle
pub struct PersistentConnection {
    connector: Arc<dyn Connector>,
    session: Mutex<SessionSlot>,
    reconnects: AtomicU64,
}

impl PersistentConnection {
    /// Open the first session eagerly so misconfiguration surfaces at startup.
    ///
    /// # Errors
    /// Returns the connector's error if the first session cannot be opened.
    pub async fn connect(connector: Arc<dyn Connector>) -> StorageResult<Self> {
        let session = connector.connect().await?;
        info!(backend = connector.backend(), "Database connection established");
        Ok(Self { connector, session: Mutex::new(Some(session)), reconnects: AtomicU64::new(0) })
    }

    /// Number of sessions re-established after the first one.
    pub fn reconnect_count(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }

    /// Backend name of the underlying connector.
    pub fn backend(&self) -> &'static str {
        self.connector.backend()
    }

    async fn live_session<'g>(
        &self,
        guard: &'g mut MutexGuard<'_, SessionSlot>,
    ) -> StorageResult<&'g mut Box<dyn Session>> {
        if guard.is_none() {
            let session = self.connector.connect().await?;
            self.reconnects.fetch_add(1, Ordering::Relaxed);
            debug!(backend = self.connector.backend(), "Re-opened dropped database session");
            **guard = Some(session);
        }
        guard
            .as_mut()
            .ok_or_else(|| StorageError::Connection("no database session".to_string()))
    }

    async fn reconnect<'g>(
        &self,
        guard: &'g mut MutexGuard<'_, SessionSlot>,
        cause: &StorageError,
    ) -> StorageResult<&'g mut Box<dyn Session>> {
        warn!(backend = self.connector.backend(), error = %cause, "Database connection lost, reconnecting");
        **guard = None;
        let session = self.connector.connect().await?;
        self.reconnects.fetch_add(1, Ordering::Relaxed);
        Ok(guard.insert(session))
    }

    /// Execute a statement; returns the number of affected rows.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the statement fails, including after one
    /// reconnect-and-retry.
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> StorageResult<u64> {
        with_reconnect!(self, session => session.execute(sql, params))
    }

    /// Run a query; an empty vector means no rows matched.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the query fails, including after one
    /// reconnect-and-retry.
    pub async fn query(&self, sql: &str, params: &[SqlValue]) -> StorageResult<Rows> {
        with_reconnect!(self, session => session.query(sql, params))
    }

    /// Commit pending writes.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the commit fails.
    pub async fn commit(&self) -> StorageResult<()> {
        with_reconnect!(self, session => session.commit())
    }

    /// Whether a table with this name exists.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidIdentifier`] for names that are not
    /// plain identifiers, or the backend's error.
    pub async fn table_exists(&self, name: &str) -> StorageResult<bool> {
        validate_identifier(name)?;
        with_reconnect!(self, session => session.table_exists(name))
    }

    /// Create `name` with the given column definitions
    ///
    /// An existing table is dropped first when `overwrite` is set and left
    /// alone otherwise. Returns whether the table was created. The DDL is
    /// committed before returning.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidIdentifier`] for unsafe names, or the
    /// backend's error.
    pub async fn create_table(
        &self,
        name: &str,
        columns_ddl: &str,
        overwrite: bool,
    ) -> StorageResult<bool> {
        if self.table_exists(name).await? {
            if !overwrite {
                debug!(table = name, "Table already exists");
                return Ok(false);
            }
            self.execute(&format!("DROP TABLE {name}"), &[]).await?;
            info!(table = name, "Dropped existing table");
        }

        self.execute(&format!("CREATE TABLE {name} ({columns_ddl})"), &[]).await?;
        self.commit().await?;
        info!(table = name, "Created table");
        Ok(true)
    }
}

impl std::fmt::Debug for PersistentConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentConnection")
            .field("backend", &self.connector.backend())
            .field("reconnects", &self.reconnect_count())
            .finish_non_exhaustive()
    }
}
