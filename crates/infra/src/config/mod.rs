//! Configuration loading and management
//!
//! This module provides utilities for loading the credential file and the
//! runtime settings from environment variables.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load_credentials, load_settings_from_env, parse_credentials, probe_credential_paths,
    render_credentials, CredentialFormat,
};
