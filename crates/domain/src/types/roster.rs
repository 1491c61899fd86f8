//! Roster records mirrored between Toornament and the local cache
//!
//! Field names follow the Toornament participant schema so the records can
//! be deserialized from API responses and sent back verbatim on PATCH.
//! `role_id` and `emote_id` only live in the local cache and are never part
//! of the wire format.

use serde::{Deserialize, Serialize};

/// A single member of a team lineup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub custom_fields: PlayerCustomFields,
}

/// Custom registration fields configured for players
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCustomFields {
    #[serde(default, deserialize_with = "crate::utils::lenient::opt_string")]
    pub discord_id: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub steam_id: Option<String>,
    #[serde(default)]
    pub psn_id: Option<String>,
    #[serde(default)]
    pub xbox_live_gamertag: Option<String>,
    #[serde(default)]
    pub nintendo_network_id: Option<String>,
    #[serde(default)]
    pub rltracker_link: Option<String>,
    #[serde(default)]
    pub rltracker_link_alt_account_: Option<String>,
}

impl PlayerInfo {
    /// Discord user id parsed from the free-form custom field.
    pub fn discord_user_id(&self) -> Option<u64> {
        self.custom_fields.discord_id.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

/// A team participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    /// Toornament participant id
    #[serde(deserialize_with = "crate::utils::lenient::string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub custom_fields: TeamCustomFields,
    pub lineup: Vec<PlayerInfo>,
    /// Discord role tagging the team members
    #[serde(skip)]
    pub role_id: Option<u64>,
    /// Discord emote representing the team
    #[serde(skip)]
    pub emote_id: Option<u64>,
}

/// Custom registration fields configured for teams
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCustomFields {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub previous_team_name: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub twitch: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::lenient::opt_string")]
    pub manager_discord_id: Option<String>,
}

impl TeamInfo {
    /// Lineup member whose Discord id matches `discord_id`.
    pub fn player_by_discord_id(&self, discord_id: &str) -> Option<&PlayerInfo> {
        self.lineup
            .iter()
            .find(|player| player.custom_fields.discord_id.as_deref() == Some(discord_id))
    }
}

/// A registration wrapping a team
///
/// On the wire this is the team object with `id` holding the registration
/// id and `participant_id` holding the team's participant id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    pub id: String,
    pub team: TeamInfo,
}

#[derive(Serialize, Deserialize)]
struct RegistrationWire {
    #[serde(deserialize_with = "crate::utils::lenient::string")]
    id: String,
    #[serde(deserialize_with = "crate::utils::lenient::string")]
    participant_id: String,
    name: String,
    #[serde(default)]
    email: Option<String>,
    custom_fields: TeamCustomFields,
    lineup: Vec<PlayerInfo>,
}

impl RegistrationInfo {
    /// Participant id of the registered team.
    pub fn participant_id(&self) -> &str {
        &self.team.id
    }
}

impl Serialize for RegistrationInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        RegistrationWire {
            id: self.id.clone(),
            participant_id: self.team.id.clone(),
            name: self.team.name.clone(),
            email: self.team.email.clone(),
            custom_fields: self.team.custom_fields.clone(),
            lineup: self.team.lineup.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RegistrationInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = RegistrationWire::deserialize(deserializer)?;
        Ok(Self {
            id: wire.id,
            team: TeamInfo {
                id: wire.participant_id,
                name: wire.name,
                email: wire.email,
                custom_fields: wire.custom_fields,
                lineup: wire.lineup,
                role_id: None,
                emote_id: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn team_json() -> serde_json::Value {
        json!({
            "id": "378426939508809728",
            "name": "Flying Carpets",
            "email": null,
            "custom_fields": {
                "short_name": "FC",
                "previous_team_name": null,
                "twitter": null,
                "twitch": "https://twitch.tv/fc",
                "manager_discord_id": 178963412846460928_u64
            },
            "lineup": [
                {
                    "name": "Aladdin",
                    "user_id": null,
                    "email": "a@example.com",
                    "custom_fields": { "discord_id": "204255221017214977", "country": "DE" }
                },
                {
                    "name": "Jasmine",
                    "custom_fields": { "discord_id": 332190264530829314_u64 }
                }
            ]
        })
    }

    #[test]
    fn team_accepts_numeric_and_string_discord_ids() {
        let team: TeamInfo = serde_json::from_value(team_json()).unwrap();

        assert_eq!(team.custom_fields.manager_discord_id.as_deref(), Some("178963412846460928"));
        assert_eq!(team.lineup.len(), 2);
        assert_eq!(team.lineup[1].discord_user_id(), Some(332_190_264_530_829_314));
        assert_eq!(team.role_id, None);
    }

    #[test]
    fn finds_player_by_discord_id() {
        let team: TeamInfo = serde_json::from_value(team_json()).unwrap();

        let player = team.player_by_discord_id("204255221017214977").unwrap();
        assert_eq!(player.name, "Aladdin");
        assert!(team.player_by_discord_id("1").is_none());
    }

    #[test]
    fn local_ids_are_not_serialized() {
        let mut team: TeamInfo = serde_json::from_value(team_json()).unwrap();
        team.role_id = Some(42);
        team.emote_id = Some(43);

        let value = serde_json::to_value(&team).unwrap();
        assert!(value.get("role_id").is_none());
        assert!(value.get("emote_id").is_none());
        assert_eq!(value["lineup"][1]["custom_fields"]["discord_id"], "332190264530829314");
    }

    #[test]
    fn missing_lineup_is_rejected() {
        let mut value = team_json();
        value.as_object_mut().unwrap().remove("lineup");

        let err = serde_json::from_value::<TeamInfo>(value).unwrap_err();
        assert!(err.to_string().contains("lineup"));
    }

    #[test]
    fn registration_swaps_ids() {
        let mut value = team_json();
        value["participant_id"] = value["id"].clone();
        value["id"] = json!("900");

        let registration: RegistrationInfo = serde_json::from_value(value).unwrap();
        assert_eq!(registration.id, "900");
        assert_eq!(registration.participant_id(), "378426939508809728");

        let back = serde_json::to_value(&registration).unwrap();
        assert_eq!(back["id"], "900");
        assert_eq!(back["participant_id"], "378426939508809728");
    }
}
