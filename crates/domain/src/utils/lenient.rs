//! Lenient deserializers for identifiers
//!
//! Toornament custom fields are free-form, so identifiers such as Discord IDs
//! arrive either as JSON strings or as numbers depending on how the field was
//! filled in.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_to_string(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(format!("expected a string or number, found {other}")),
    }
}

/// Required identifier given as a string or a number.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_string(value)
        .map_err(serde::de::Error::custom)?
        .ok_or_else(|| serde::de::Error::custom("identifier must not be null"))
}

/// Optional identifier given as a string, a number or null.
///
/// Empty strings are treated as absent.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = value_to_string(value).map_err(serde::de::Error::custom)?;
    Ok(parsed.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "super::string")]
        id: String,
        #[serde(default, deserialize_with = "super::opt_string")]
        discord_id: Option<String>,
    }

    #[test]
    fn accepts_numbers_and_strings() {
        let probe: Probe =
            serde_json::from_str(r#"{"id": 42, "discord_id": "178963412846460928"}"#).unwrap();
        assert_eq!(probe.id, "42");
        assert_eq!(probe.discord_id.as_deref(), Some("178963412846460928"));
    }

    #[test]
    fn null_and_empty_optional_ids_are_absent() {
        let probe: Probe = serde_json::from_str(r#"{"id": "7", "discord_id": null}"#).unwrap();
        assert!(probe.discord_id.is_none());

        let probe: Probe = serde_json::from_str(r#"{"id": "7", "discord_id": " "}"#).unwrap();
        assert!(probe.discord_id.is_none());
    }

    #[test]
    fn null_required_id_is_rejected() {
        assert!(serde_json::from_str::<Probe>(r#"{"id": null}"#).is_err());
    }
}
