//! Postgres backend for the local cache
//!
//! Parameters are bound according to the types Postgres infers for the
//! prepared statement, so `SqlValue::Null` becomes a typed NULL and
//! integers fit `INT2`/`INT4`/`INT8` columns alike. Writes open a
//! transaction lazily; it stays open until [`Session::commit`]. A failed
//! write rolls the open transaction back.

use std::time::Duration;

use async_trait::async_trait;
use postgres_native_tls::MakeTlsConnector;
use rosterlink_common::storage::{Connector, Row, Rows, Session, SqlValue, StorageError, StorageResult};
use rosterlink_domain::constants::DEFAULT_POSTGRES_PORT;
use rosterlink_domain::DatabaseCredentials;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, Config, NoTls, Statement};
use tracing::{debug, warn};

use crate::errors::IntoStorageError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type BoxedParam = Box<dyn ToSql + Sync + Send>;

/// Opens sessions on one Postgres database
#[derive(Clone)]
pub struct PostgresConnector {
    config: Config,
    tls: bool,
}

impl PostgresConnector {
    /// Connector for the credential file's database section.
    pub fn new(credentials: &DatabaseCredentials, tls: bool) -> Self {
        let mut config = Config::new();
        config
            .host(&credentials.host)
            .port(credentials.port.unwrap_or(DEFAULT_POSTGRES_PORT))
            .user(&credentials.user)
            .password(&credentials.password)
            .dbname(&credentials.database)
            .application_name("rosterlink")
            .connect_timeout(CONNECT_TIMEOUT);

        Self { config, tls }
    }

    fn make_tls() -> StorageResult<MakeTlsConnector> {
        let connector = native_tls::TlsConnector::builder()
            .build()
            .map_err(|e| StorageError::Connection(format!("failed to initialise TLS: {e}")))?;
        Ok(MakeTlsConnector::new(connector))
    }
}

impl std::fmt::Debug for PostgresConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConnector")
            .field("host", &self.config.get_hosts())
            .field("dbname", &self.config.get_dbname())
            .field("tls", &self.tls)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn connect(&self) -> StorageResult<Box<dyn Session>> {
        let connect_error = |e: tokio_postgres::Error| StorageError::Connection(e.to_string());

        let client = if self.tls {
            let (client, connection) =
                self.config.connect(Self::make_tls()?).await.map_err(connect_error)?;
            tokio::spawn(async move {
                if let Err(err) = connection.await {
                    warn!(error = %err, "Postgres connection closed");
                }
            });
            client
        } else {
            let (client, connection) = self.config.connect(NoTls).await.map_err(connect_error)?;
            tokio::spawn(async move {
                if let Err(err) = connection.await {
                    warn!(error = %err, "Postgres connection closed");
                }
            });
            client
        };

        debug!(tls = self.tls, "Postgres session opened");
        Ok(Box::new(PostgresSession { client, in_transaction: false }))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// One Postgres connection
pub struct PostgresSession {
    client: Client,
    in_transaction: bool,
}

impl PostgresSession {
    fn ensure_open(&self) -> StorageResult<()> {
        if self.client.is_closed() {
            return Err(StorageError::ConnectionLost("postgres connection closed".into()));
        }
        Ok(())
    }

    async fn prepare(&self, sql: &str, params: &[SqlValue]) -> StorageResult<(Statement, Vec<BoxedParam>)> {
        self.ensure_open()?;
        let statement = self.client.prepare(sql).await.map_err(IntoStorageError::into_storage)?;

        let types = statement.params();
        if types.len() > params.len() {
            return Err(StorageError::Query(format!(
                "statement expects {} parameters, got {}",
                types.len(),
                params.len()
            )));
        }

        let bound = types
            .iter()
            .zip(params)
            .enumerate()
            .map(|(index, (ty, value))| bind(index, ty, value))
            .collect::<StorageResult<Vec<_>>>()?;
        Ok((statement, bound))
    }

    async fn rollback_after_failure(&mut self) {
        if !self.in_transaction {
            return;
        }
        self.in_transaction = false;
        if let Err(err) = self.client.batch_execute("ROLLBACK").await {
            debug!(error = %err, "Rollback after failed statement did not complete");
        }
    }
}

#[async_trait]
impl Session for PostgresSession {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> StorageResult<u64> {
        self.ensure_open()?;
        if !self.in_transaction {
            self.client.batch_execute("BEGIN").await.map_err(IntoStorageError::into_storage)?;
            self.in_transaction = true;
        }

        let result = match self.prepare(sql, params).await {
            Ok((statement, bound)) => {
                let refs: Vec<&(dyn ToSql + Sync)> =
                    bound.iter().map(|p| p.as_ref() as &(dyn ToSql + Sync)).collect();
                self.client.execute(&statement, &refs).await.map_err(IntoStorageError::into_storage)
            }
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            if !err.is_connection_lost() {
                self.rollback_after_failure().await;
            }
        }
        result
    }

    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> StorageResult<Rows> {
        let (statement, bound) = self.prepare(sql, params).await?;
        let refs: Vec<&(dyn ToSql + Sync)> =
            bound.iter().map(|p| p.as_ref() as &(dyn ToSql + Sync)).collect();

        let rows = self
            .client
            .query(&statement, &refs)
            .await
            .map_err(IntoStorageError::into_storage)?;

        rows.iter().map(decode_row).collect()
    }

    async fn commit(&mut self) -> StorageResult<()> {
        if !self.in_transaction {
            return Ok(());
        }
        self.ensure_open()?;
        self.in_transaction = false;
        self.client.batch_execute("COMMIT").await.map_err(IntoStorageError::into_storage)
    }

    async fn table_exists(&mut self, name: &str) -> StorageResult<bool> {
        let rows = self
            .query(
                "SELECT 1 FROM information_schema.tables \
                 WHERE table_schema = current_schema() AND table_name = lower($1::text)",
                &[SqlValue::from(name)],
            )
            .await?;
        Ok(!rows.is_empty())
    }
}

// ============================================================================
// Type mapping
// ============================================================================

/// Column families the cache knows how to bind and decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int8,
    Int4,
    Int2,
    Bool,
    Text,
    Other,
}

impl ColumnKind {
    fn of(ty: &Type) -> Self {
        if *ty == Type::INT8 {
            Self::Int8
        } else if *ty == Type::INT4 {
            Self::Int4
        } else if *ty == Type::INT2 {
            Self::Int2
        } else if *ty == Type::BOOL {
            Self::Bool
        } else if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME].contains(ty) {
            Self::Text
        } else {
            Self::Other
        }
    }
}

fn bind(index: usize, ty: &Type, value: &SqlValue) -> StorageResult<BoxedParam> {
    let mismatch = || StorageError::Query(format!("parameter ${} cannot be bound as {ty}", index + 1));
    let out_of_range =
        || StorageError::Query(format!("parameter ${} is out of range for {ty}", index + 1));

    let param: BoxedParam = match (value, ColumnKind::of(ty)) {
        (SqlValue::Null, ColumnKind::Int8) => Box::new(None::<i64>),
        (SqlValue::Null, ColumnKind::Int4) => Box::new(None::<i32>),
        (SqlValue::Null, ColumnKind::Int2) => Box::new(None::<i16>),
        (SqlValue::Null, ColumnKind::Bool) => Box::new(None::<bool>),
        (SqlValue::Null, _) => Box::new(None::<String>),
        (SqlValue::Int(v), ColumnKind::Int8) => Box::new(*v),
        (SqlValue::Int(v), ColumnKind::Int4) => {
            Box::new(i32::try_from(*v).map_err(|_| out_of_range())?)
        }
        (SqlValue::Int(v), ColumnKind::Int2) => {
            Box::new(i16::try_from(*v).map_err(|_| out_of_range())?)
        }
        (SqlValue::Int(v), ColumnKind::Bool) => Box::new(*v != 0),
        (SqlValue::Int(v), ColumnKind::Text) => Box::new(v.to_string()),
        (SqlValue::Text(s), ColumnKind::Text) => Box::new(s.clone()),
        (SqlValue::Text(s), ColumnKind::Int8) => {
            Box::new(s.trim().parse::<i64>().map_err(|_| mismatch())?)
        }
        _ => return Err(mismatch()),
    };
    Ok(param)
}

fn decode_row(row: &tokio_postgres::Row) -> StorageResult<Row> {
    let decode_error = |index: usize, e: tokio_postgres::Error| StorageError::Decode {
        index,
        message: e.to_string(),
    };

    let values = row
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let value = match ColumnKind::of(column.type_()) {
                ColumnKind::Int8 => row.try_get::<_, Option<i64>>(index).map(|v| v.map(SqlValue::Int)),
                ColumnKind::Int4 => row
                    .try_get::<_, Option<i32>>(index)
                    .map(|v| v.map(|v| SqlValue::Int(v.into()))),
                ColumnKind::Int2 => row
                    .try_get::<_, Option<i16>>(index)
                    .map(|v| v.map(|v| SqlValue::Int(v.into()))),
                ColumnKind::Bool => row
                    .try_get::<_, Option<bool>>(index)
                    .map(|v| v.map(|v| SqlValue::Int(v.into()))),
                ColumnKind::Text => {
                    row.try_get::<_, Option<String>>(index).map(|v| v.map(SqlValue::Text))
                }
                ColumnKind::Other => {
                    return Err(StorageError::Decode {
                        index,
                        message: format!("unsupported column type {}", column.type_()),
                    })
                }
            };

            value.map(|v| v.unwrap_or(SqlValue::Null)).map_err(|e| decode_error(index, e))
        })
        .collect::<StorageResult<Vec<_>>>()?;

    Ok(Row::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_binds_with_the_inferred_column_type() {
        assert!(bind(0, &Type::INT8, &SqlValue::Null).is_ok());
        assert!(bind(0, &Type::TEXT, &SqlValue::Null).is_ok());
        assert_eq!(ColumnKind::of(&Type::VARCHAR), ColumnKind::Text);
        assert_eq!(ColumnKind::of(&Type::JSONB), ColumnKind::Other);
    }

    #[test]
    fn integers_are_narrowed_or_rejected() {
        assert!(bind(0, &Type::INT4, &SqlValue::Int(42)).is_ok());
        let err = bind(1, &Type::INT4, &SqlValue::Int(i64::MAX)).err().unwrap();
        assert!(err.to_string().contains("$2"));
    }

    #[test]
    fn text_cannot_bind_to_boolean() {
        assert!(matches!(
            bind(0, &Type::BOOL, &SqlValue::from("yes")),
            Err(StorageError::Query(_))
        ));
    }

    #[test]
    fn debug_output_omits_password() {
        let connector = PostgresConnector::new(
            &DatabaseCredentials {
                host: "db.local".into(),
                port: None,
                user: "bot".into(),
                password: "hunter2".into(),
                database: "roster".into(),
            },
            false,
        );
        let rendered = format!("{connector:?}");
        assert!(rendered.contains("roster"));
        assert!(!rendered.contains("hunter2"));
    }
}
