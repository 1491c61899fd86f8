//! Serde adapter for credential file timestamps
//!
//! Timestamps are stored as `DD.MM.YYYY, HH:MM:SS` in UTC with second
//! precision. Use with `#[serde(with = "crate::utils::expiry_format")]`.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::constants::EXPIRY_DATE_FORMAT;

/// Format a timestamp the way the credential file stores it.
pub fn format(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(EXPIRY_DATE_FORMAT).to_string()
}

/// Parse a credential file timestamp.
///
/// # Errors
/// Returns the chrono parse error if `value` does not match
/// `DD.MM.YYYY, HH:MM:SS`.
pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), EXPIRY_DATE_FORMAT).map(|naive| naive.and_utc())
}

/// Drop sub-second precision so a value survives a format/parse cycle.
pub fn truncate(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.trunc_subsecs(0)
}

pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(timestamp))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|err| {
        serde::de::Error::custom(format!(
            "invalid timestamp '{raw}', expected DD.MM.YYYY, HH:MM:SS: {err}"
        ))
    })
}
