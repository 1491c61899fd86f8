//! Storage primitives for the relational cache
//!
//! This module provides backend-agnostic storage infrastructure: value and
//! row types, the `Connector`/`Session` traits implemented per backend, and
//! [`PersistentConnection`], a shared handle that survives dropped server
//! connections.

pub mod error;
pub mod persistent;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use persistent::PersistentConnection;
pub use traits::{Connector, Session};
pub use types::{validate_identifier, Row, Rows, SqlValue};
