//! Scripted chat platform

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rosterlink_core::ChatPlatform;
use rosterlink_domain::{ChatGroup, ChatMember, Result};

pub struct FakeChat {
    pub members: HashSet<u64>,
    pub groups: Mutex<HashMap<u64, ChatGroup>>,
    pub assignments: Mutex<Vec<(u64, u64)>>,
    next_id: AtomicU64,
}

impl FakeChat {
    pub fn new(members: &[u64], groups: &[(u64, &str)]) -> Self {
        Self {
            members: members.iter().copied().collect(),
            groups: Mutex::new(
                groups
                    .iter()
                    .map(|(id, name)| (*id, ChatGroup { id: *id, name: (*name).to_string() }))
                    .collect(),
            ),
            assignments: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1_000),
        }
    }

    pub fn group_named(&self, name: &str) -> Option<ChatGroup> {
        self.groups.lock().values().find(|g| g.name == name).cloned()
    }
}

#[async_trait]
impl ChatPlatform for FakeChat {
    async fn resolve_member(&self, _guild_id: u64, user_id: u64) -> Result<Option<ChatMember>> {
        Ok(self
            .members
            .contains(&user_id)
            .then(|| ChatMember { id: user_id, display_name: format!("user-{user_id}") }))
    }

    async fn create_group(
        &self,
        _guild_id: u64,
        name: &str,
        _template: &ChatGroup,
    ) -> Result<ChatGroup> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let group = ChatGroup { id, name: name.to_string() };
        self.groups.lock().insert(id, group.clone());
        Ok(group)
    }

    async fn lookup_group(&self, _guild_id: u64, group_id: u64) -> Result<Option<ChatGroup>> {
        Ok(self.groups.lock().get(&group_id).cloned())
    }

    async fn assign_group(
        &self,
        _guild_id: u64,
        member: &ChatMember,
        group: &ChatGroup,
    ) -> Result<()> {
        self.assignments.lock().push((member.id, group.id));
        Ok(())
    }
}
