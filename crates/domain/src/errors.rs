//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for RosterLink
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RosterLinkError {
    /// Malformed or incomplete credential/configuration data.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The OAuth2 token exchange failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The tournament API answered with a non-success status.
    #[error("Remote API error: HTTP {status}: {body}")]
    RemoteApi { status: u16, body: String },

    /// A datastore operation failed, including after a reconnect attempt.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A response or record does not match the expected schema.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RosterLinkError {
    /// HTTP status carried by a [`RosterLinkError::RemoteApi`] error.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for RosterLink operations
pub type Result<T> = std::result::Result<T, RosterLinkError>;
