//! Storage error types

use thiserror::Error;

/// Storage error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The server connection went away; the handle must be re-established
    #[error("Database connection lost: {0}")]
    ConnectionLost(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(String),

    #[error("Database transaction error: {0}")]
    Transaction(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A column value does not have the expected type
    #[error("Column {index}: {message}")]
    Decode { index: usize, message: String },
}

impl StorageError {
    /// Whether the reconnect-and-retry path applies to this error.
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Self::ConnectionLost(_))
    }
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;
