use std::time::Duration;

use rosterlink_domain::{impl_domain_enum_conversions, RosterLinkError};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable selecting the log output format
pub const LOG_FORMAT_ENV: &str = "ROSTERLINK_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl_domain_enum_conversions!(LogFormat {
    Pretty => "pretty",
    Json => "json",
});

impl LogFormat {
    /// Format named by `ROSTERLINK_LOG_FORMAT`, `Pretty` when unset or
    /// unrecognised.
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV).ok().and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

/// Install the global tracing subscriber in the format named by
/// `ROSTERLINK_LOG_FORMAT`.
pub fn init_tracing() {
    init_tracing_with(LogFormat::from_env());
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` (default `info`). Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init_tracing_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => {
            registry.with(fmt::layer().json().with_current_span(true)).try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"roster::sync_tournament"` and
/// must not carry sensitive values.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `RosterLinkError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &RosterLinkError) -> &'static str {
    match error {
        RosterLinkError::Config(_) => "config",
        RosterLinkError::Auth(_) => "auth",
        RosterLinkError::RemoteApi { .. } => "remote_api",
        RosterLinkError::Storage(_) => "storage",
        RosterLinkError::Parse(_) => "parse",
        RosterLinkError::Network(_) => "network",
        RosterLinkError::NotFound(_) => "not_found",
        RosterLinkError::InvalidInput(_) => "invalid_input",
        RosterLinkError::Internal(_) => "internal",
    }
}
