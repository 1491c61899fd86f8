//! # RosterLink Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the tournament API, the local
//!   cache and the chat platform
//! - The roster sync use case
//!
//! ## Architecture Principles
//! - Only depends on `rosterlink-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod chat_ports;
pub mod roster;

pub use chat_ports::ChatPlatform;
pub use roster::ports::{
    BotConfigRepository, TeamRepository, TournamentApi, TournamentRepository,
};
pub use roster::RosterSyncService;
