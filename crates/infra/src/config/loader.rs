//! Configuration loader
//!
//! ## Credential File
//! The credential file holds the Discord, Toornament, database and
//! Ballchasing secrets plus the current Toornament bearer token. JSON and
//! TOML are supported (detected by file extension).
//!
//! When no path is given, the loader probes the following paths (in order):
//! 1. `./auth.json`, `./auth.toml` (current working directory)
//! 2. `./config/auth.json`, `./config/auth.toml`
//! 3. Relative to executable location
//!
//! ## Environment Variables
//! - `ROSTERLINK_AUTH_PATH`: Credential file path
//! - `ROSTERLINK_API_BASE_URL`: Toornament API base URL
//! - `ROSTERLINK_RATE_LIMIT_MS`: Minimum interval between API requests
//! - `ROSTERLINK_HTTP_TIMEOUT_SECS`: HTTP request timeout
//! - `ROSTERLINK_TOKEN_MARGIN_SECS`: Refresh bearer tokens this early
//! - `ROSTERLINK_PAGE_SIZE`: Participants per paginated request
//! - `ROSTERLINK_CACHE_BACKEND`: `postgres` or `sqlite`
//! - `ROSTERLINK_SQLITE_PATH`: SQLite cache file
//! - `ROSTERLINK_DB_TLS`: Connect to Postgres over TLS (true/false)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rosterlink_domain::{CacheBackend, Credentials, Result, RosterLinkError, Settings};

/// Serialization format of a credential file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFormat {
    Json,
    Toml,
}

impl CredentialFormat {
    /// Format implied by the file extension; files without one are JSON.
    ///
    /// # Errors
    /// Returns `RosterLinkError::Config` for unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("json") {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(RosterLinkError::Config(format!("Unsupported credential format: {other}"))),
        }
    }
}

/// Load the credential file
///
/// If `path` is `None`, probes the standard locations. Returns the parsed
/// credentials together with the path they were read from, so the token
/// can be written back to the same file.
///
/// # Errors
/// Returns `RosterLinkError::Config` if:
/// - File not found (when path is specified)
/// - No credential file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or the expiry date is malformed
pub fn load_credentials(path: Option<PathBuf>) -> Result<(Credentials, PathBuf)> {
    let credential_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RosterLinkError::Config(format!(
                    "Credential file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_credential_paths().ok_or_else(|| {
            RosterLinkError::Config(
                "No credential file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %credential_path.display(), "Loading credentials from file");

    let contents = std::fs::read_to_string(&credential_path)
        .map_err(|e| RosterLinkError::Config(format!("Failed to read credential file: {}", e)))?;

    let credentials = parse_credentials(&contents, &credential_path)?;
    Ok((credentials, credential_path))
}

/// Parse credentials from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `RosterLinkError::Config` if format is invalid or parsing fails.
pub fn parse_credentials(contents: &str, path: &Path) -> Result<Credentials> {
    match CredentialFormat::from_path(path)? {
        CredentialFormat::Toml => toml::from_str(contents)
            .map_err(|e| RosterLinkError::Config(format!("Invalid TOML format: {}", e))),
        CredentialFormat::Json => serde_json::from_str(contents)
            .map_err(|e| RosterLinkError::Config(format!("Invalid JSON format: {}", e))),
    }
}

/// Serialize credentials in the format implied by `path`.
///
/// JSON output is pretty-printed with four-space indentation.
///
/// # Errors
/// Returns `RosterLinkError::Config` if serialization fails.
pub fn render_credentials(credentials: &Credentials, path: &Path) -> Result<String> {
    match CredentialFormat::from_path(path)? {
        CredentialFormat::Toml => toml::to_string_pretty(credentials)
            .map_err(|e| RosterLinkError::Config(format!("Failed to encode TOML: {e}"))),
        CredentialFormat::Json => {
            let mut out = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
            serde::Serialize::serialize(credentials, &mut serializer)
                .map_err(|e| RosterLinkError::Config(format!("Failed to encode JSON: {e}")))?;
            String::from_utf8(out)
                .map_err(|e| RosterLinkError::Internal(format!("non UTF-8 JSON output: {e}")))
        }
    }
}

/// Probe multiple paths for the credential file
///
/// # Returns
/// The first credential file found, or `None` if no file exists.
pub fn probe_credential_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("auth.json"),
            cwd.join("auth.toml"),
            cwd.join("config/auth.json"),
            cwd.join("config/auth.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![exe_dir.join("auth.json"), exe_dir.join("auth.toml")]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Load runtime settings from environment variables
///
/// Every variable is optional; unset variables keep their defaults.
///
/// # Errors
/// Returns `RosterLinkError::Config` if a variable is set to an invalid value.
pub fn load_settings_from_env() -> Result<Settings> {
    let defaults = Settings::default();

    Ok(Settings {
        auth_path: std::env::var("ROSTERLINK_AUTH_PATH").ok().map(PathBuf::from),
        api_base_url: std::env::var("ROSTERLINK_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url),
        rate_limit_interval_ms: env_parse("ROSTERLINK_RATE_LIMIT_MS", defaults.rate_limit_interval_ms)?,
        http_timeout_secs: env_parse("ROSTERLINK_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
        token_margin_secs: env_parse("ROSTERLINK_TOKEN_MARGIN_SECS", defaults.token_margin_secs)?,
        page_size: match env_parse("ROSTERLINK_PAGE_SIZE", defaults.page_size)? {
            0 => return Err(RosterLinkError::Config("Invalid page size: 0".to_string())),
            size => size,
        },
        cache_backend: env_parse::<CacheBackend>("ROSTERLINK_CACHE_BACKEND", defaults.cache_backend)?,
        sqlite_path: std::env::var("ROSTERLINK_SQLITE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.sqlite_path),
        db_tls: env_bool("ROSTERLINK_DB_TLS", defaults.db_tls),
    })
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `RosterLinkError::Config` if the variable is set but invalid.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| RosterLinkError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
