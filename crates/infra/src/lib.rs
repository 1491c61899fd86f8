//! # RosterLink Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The Toornament HTTP API client (OAuth2, rate limiting, pagination)
//! - The credential file store and configuration loading
//! - Cache database connectors (Postgres, SQLite) and repositories
//!
//! ## Architecture
//! - Implements traits defined in `rosterlink-core` and `rosterlink-common`
//! - Contains all "impure" code (network, files, databases)

pub mod config;
pub mod credentials;
pub mod database;
pub mod errors;
pub mod http;
pub mod toornament;

// Re-export commonly used items
pub use credentials::CredentialStore;
pub use database::DbManager;
pub use errors::InfraError;
pub use http::HttpClient;
pub use toornament::ToornamentClient;
