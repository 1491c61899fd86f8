//! Durable credential storage
//!
//! The credential file is the single source of the Toornament bearer token;
//! [`CredentialStore`] keeps it in memory and writes it back on refresh.

pub mod store;

pub use store::CredentialStore;
