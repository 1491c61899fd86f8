//! Chat platform port
//!
//! The chat platform (Discord) owns members and groups. The bot only needs
//! to look them up, create team groups and push membership.

use async_trait::async_trait;
use rosterlink_domain::{ChatGroup, ChatMember, Result};

/// Trait for the chat-platform collaborator
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Find a guild member by user id.
    async fn resolve_member(&self, guild_id: u64, user_id: u64) -> Result<Option<ChatMember>>;

    /// Create a group named `name`, copying settings from `template`.
    async fn create_group(&self, guild_id: u64, name: &str, template: &ChatGroup)
        -> Result<ChatGroup>;

    /// Find a group by id.
    async fn lookup_group(&self, guild_id: u64, group_id: u64) -> Result<Option<ChatGroup>>;

    /// Add `member` to `group`.
    async fn assign_group(&self, guild_id: u64, member: &ChatMember, group: &ChatGroup)
        -> Result<()>;
}
