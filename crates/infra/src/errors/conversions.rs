//! Conversions from external infrastructure errors into domain errors.
//!
//! Driver errors (`rusqlite`, `tokio-postgres`) are first classified into a
//! [`StorageError`] so the reconnect logic can recognise a dropped server
//! connection; everything else maps straight to [`RosterLinkError`].

use reqwest::Error as HttpError;
use rosterlink_common::auth::{ExchangeError, TokenManagerError};
use rosterlink_common::storage::StorageError;
use rosterlink_domain::RosterLinkError;
use rusqlite::Error as SqlError;
use tokio_postgres::Error as PgError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RosterLinkError);

impl From<InfraError> for RosterLinkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RosterLinkError> for InfraError {
    fn from(value: RosterLinkError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRosterLinkError {
    fn into_rosterlink(self) -> RosterLinkError;
}

/// Classification of driver errors into [`StorageError`].
pub(crate) trait IntoStorageError {
    fn into_storage(self) -> StorageError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → StorageError */
/* -------------------------------------------------------------------------- */

impl IntoStorageError for SqlError {
    fn into_storage(self) -> StorageError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => StorageError::Query("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        StorageError::Query("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        StorageError::Query(format!("unique constraint violation: {message}"))
                    }
                    (ErrorCode::CannotOpen, _) => {
                        StorageError::Connection(format!("unable to open database: {message}"))
                    }
                    _ => StorageError::Query(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::InvalidColumnType(index, name, ty) => StorageError::Decode {
                index,
                message: format!("invalid column type for {name}: {ty}"),
            },
            RE::Utf8Error(_) => StorageError::Decode {
                index: 0,
                message: "invalid UTF-8 returned from sqlite".into(),
            },
            RE::InvalidParameterName(parameter_name) => {
                StorageError::Query(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => StorageError::Connection(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => StorageError::Query("invalid SQL query".into()),
            other => StorageError::Query(other.to_string()),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* tokio_postgres::Error → StorageError */
/* -------------------------------------------------------------------------- */

impl IntoStorageError for PgError {
    fn into_storage(self) -> StorageError {
        if self.is_closed() {
            return StorageError::ConnectionLost("postgres connection closed".into());
        }

        let io_failure = std::error::Error::source(&self)
            .is_some_and(|source| source.downcast_ref::<std::io::Error>().is_some());
        if io_failure {
            return StorageError::ConnectionLost(format!("postgres I/O failure: {self}"));
        }

        match self.as_db_error() {
            Some(db) if db.code().code().starts_with("08") => {
                StorageError::ConnectionLost(format!("postgres connection exception: {}", db.message()))
            }
            Some(db) => StorageError::Query(format!("{} ({})", db.message(), db.code().code())),
            None => StorageError::Query(self.to_string()),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → RosterLinkError */
/* -------------------------------------------------------------------------- */

impl IntoRosterLinkError for StorageError {
    fn into_rosterlink(self) -> RosterLinkError {
        RosterLinkError::Storage(self.to_string())
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_rosterlink())
    }
}

/* -------------------------------------------------------------------------- */
/* Token errors → RosterLinkError */
/* -------------------------------------------------------------------------- */

impl IntoRosterLinkError for TokenManagerError {
    fn into_rosterlink(self) -> RosterLinkError {
        match self {
            TokenManagerError::ExchangeFailed(ExchangeError::Rejected { status, body }) => {
                RosterLinkError::Auth(format!("token endpoint returned HTTP {status}: {body}"))
            }
            other => RosterLinkError::Auth(other.to_string()),
        }
    }
}

impl From<TokenManagerError> for InfraError {
    fn from(value: TokenManagerError) -> Self {
        InfraError(value.into_rosterlink())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RosterLinkError */
/* -------------------------------------------------------------------------- */

impl IntoRosterLinkError for HttpError {
    fn into_rosterlink(self) -> RosterLinkError {
        if self.is_timeout() {
            return RosterLinkError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return RosterLinkError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return RosterLinkError::Parse(format!("failed to decode HTTP response: {self}"));
        }

        if self.is_builder() {
            return RosterLinkError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        RosterLinkError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_rosterlink())
    }
}

/// Shorthand used by adapters returning domain results.
pub(crate) fn domain<E: Into<InfraError>>(err: E) -> RosterLinkError {
    err.into().into()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
