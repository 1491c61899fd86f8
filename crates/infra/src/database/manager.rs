//! Database manager wrapping the shared reconnecting connection.

use std::path::Path;
use std::sync::Arc;

use rosterlink_common::storage::{Connector, PersistentConnection, StorageError};
use rosterlink_domain::{CacheBackend, DatabaseCredentials, Result, RosterLinkError, Settings};
use tracing::info;

use super::postgres::PostgresConnector;
use super::sqlite::SqliteConnector;
use crate::errors::domain;

/// A cache table and its column definitions
struct TableDef {
    name: &'static str,
    columns: &'static str,
}

const TEAMS: TableDef = TableDef {
    name: "teams",
    columns: "participant_id TEXT NOT NULL PRIMARY KEY, \
              role_id BIGINT, \
              emote_id BIGINT, \
              name TEXT NOT NULL, \
              tournament_id TEXT NOT NULL",
};

const TOURNAMENTS: TableDef = TableDef {
    name: "tournaments",
    columns: "tournament_id TEXT NOT NULL PRIMARY KEY, \
              guild_id BIGINT NOT NULL, \
              name TEXT",
};

const BOT_CONFIG: TableDef = TableDef {
    name: "bot_config",
    columns: "tournament_id TEXT NOT NULL, \
              name TEXT NOT NULL, \
              value TEXT, \
              PRIMARY KEY (tournament_id, name)",
};

const REGISTRATION_ISSUES_SQLITE: TableDef = TableDef {
    name: "registration_issues",
    columns: "issue_id INTEGER PRIMARY KEY AUTOINCREMENT, \
              registration_id TEXT NOT NULL, \
              description TEXT NOT NULL",
};

const REGISTRATION_ISSUES_POSTGRES: TableDef = TableDef {
    name: "registration_issues",
    columns: "issue_id BIGSERIAL PRIMARY KEY, \
              registration_id TEXT NOT NULL, \
              description TEXT NOT NULL",
};

/// Owner of the cache connection
pub struct DbManager {
    conn: Arc<PersistentConnection>,
    backend: CacheBackend,
}

impl DbManager {
    /// Open the cache selected by `settings`.
    ///
    /// # Errors
    /// Returns `RosterLinkError::Storage` if the first connection fails.
    pub async fn open(settings: &Settings, database: &DatabaseCredentials) -> Result<Self> {
        match settings.cache_backend {
            CacheBackend::Sqlite => Self::connect_sqlite(&settings.sqlite_path).await,
            CacheBackend::Postgres => Self::connect_postgres(database, settings.db_tls).await,
        }
    }

    /// Open (or create) a SQLite cache file.
    pub async fn connect_sqlite(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(db_path = %path.display(), "Opening SQLite cache");
        Self::with_connector(Arc::new(SqliteConnector::new(path)), CacheBackend::Sqlite).await
    }

    /// Connect to the Postgres cache from the credential file.
    pub async fn connect_postgres(database: &DatabaseCredentials, tls: bool) -> Result<Self> {
        info!(host = %database.host, database = %database.database, tls, "Connecting to Postgres cache");
        Self::with_connector(Arc::new(PostgresConnector::new(database, tls)), CacheBackend::Postgres)
            .await
    }

    /// Manager over an arbitrary connector.
    pub async fn with_connector(connector: Arc<dyn Connector>, backend: CacheBackend) -> Result<Self> {
        let conn = PersistentConnection::connect(connector).await.map_err(domain)?;
        Ok(Self { conn: Arc::new(conn), backend })
    }

    /// Shared connection used by the repositories.
    pub fn connection(&self) -> &Arc<PersistentConnection> {
        &self.conn
    }

    pub fn backend(&self) -> CacheBackend {
        self.backend
    }

    /// Create every cache table that does not exist yet
    ///
    /// With `overwrite`, existing tables are dropped and recreated. Returns
    /// the names of the tables that were created.
    ///
    /// # Errors
    /// Returns `RosterLinkError::Storage` if any DDL statement fails.
    pub async fn init_tables(&self, overwrite: bool) -> Result<Vec<&'static str>> {
        let registration_issues = match self.backend {
            CacheBackend::Sqlite => &REGISTRATION_ISSUES_SQLITE,
            CacheBackend::Postgres => &REGISTRATION_ISSUES_POSTGRES,
        };

        let mut created = Vec::new();
        for table in [&TEAMS, &TOURNAMENTS, &BOT_CONFIG, registration_issues] {
            if self.conn.create_table(table.name, table.columns, overwrite).await.map_err(domain)? {
                created.push(table.name);
            }
        }

        info!(backend = %self.backend, ?created, overwrite, "Cache tables initialised");
        Ok(created)
    }

    /// Verify the cache answers a trivial query.
    ///
    /// # Errors
    /// Returns `RosterLinkError::Storage` if the query fails.
    pub async fn health_check(&self) -> Result<()> {
        let rows = self.conn.query("SELECT 1", &[]).await.map_err(domain)?;
        if rows.is_empty() {
            return Err(domain(StorageError::Query("health check returned no rows".into())));
        }
        Ok(())
    }
}

/// Convert a cached 64-bit id into the signed column representation.
pub(crate) fn id_to_sql(id: u64) -> Result<i64> {
    i64::try_from(id)
        .map_err(|_| RosterLinkError::InvalidInput(format!("id {id} does not fit a BIGINT column")))
}

/// Convert a signed column value back into a 64-bit id.
pub(crate) fn id_from_sql(value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| RosterLinkError::Parse(format!("negative id {value} in cache")))
}
