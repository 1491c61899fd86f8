//! Shared test helpers for `rosterlink-core` integration tests.
//!
//! In-memory implementations of the roster ports plus a scripted chat
//! platform, so sync tests can focus on behaviour instead of plumbing.

#![allow(dead_code)]

pub mod chat;
pub mod repositories;

use rosterlink_domain::{PlayerCustomFields, PlayerInfo, TeamCustomFields, TeamInfo};

/// Team with the given lineup of `(name, discord_id)` pairs.
pub fn team(id: &str, name: &str, lineup: &[(&str, Option<&str>)]) -> TeamInfo {
    TeamInfo {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
        custom_fields: TeamCustomFields::default(),
        lineup: lineup
            .iter()
            .map(|(player, discord_id)| PlayerInfo {
                name: (*player).to_string(),
                user_id: None,
                email: None,
                custom_fields: PlayerCustomFields {
                    discord_id: discord_id.map(str::to_string),
                    ..PlayerCustomFields::default()
                },
            })
            .collect(),
        role_id: None,
        emote_id: None,
    }
}
