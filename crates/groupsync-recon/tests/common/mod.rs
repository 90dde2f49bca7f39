//! Test harness for the reconciliation routines.
//!
//! Provides an in-memory [`MembershipStore`] with the same observable
//! semantics as the Postgres implementation, plus failure injection for
//! exercising best-effort batch behavior.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use groupsync_db::{
    DbError, DuplicateLinks, Group, GroupId, LinkId, MembershipStore, NewGroup, UserId,
};

#[derive(Debug, Clone)]
struct LinkRow {
    id: LinkId,
    group_id: GroupId,
    user_id: UserId,
}

#[derive(Default)]
struct State {
    groups: Vec<Group>,
    users: Vec<UserId>,
    links: Vec<LinkRow>,
    fail_on_delete: HashSet<LinkId>,
}

/// In-memory membership store.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return its id.
    pub fn add_user(&self) -> UserId {
        let id = UserId::from(Uuid::new_v4());
        self.state.lock().unwrap().users.push(id);
        id
    }

    /// Insert a group directly, bypassing the lifecycle guard.
    pub fn add_group(&self, name: &str, deny_edit: bool, deny_delete: bool) -> GroupId {
        self.add_group_inner(name, deny_edit, deny_delete, None)
    }

    /// Insert an already-trashed group.
    pub fn add_trashed_group(&self, name: &str) -> GroupId {
        self.add_group_inner(name, false, false, Some(Utc::now()))
    }

    fn add_group_inner(
        &self,
        name: &str,
        deny_edit: bool,
        deny_delete: bool,
        trashed: Option<DateTime<Utc>>,
    ) -> GroupId {
        let group = Group {
            id: GroupId::new(),
            name: name.to_string(),
            deny_edit,
            deny_delete,
            trashed,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        };
        let id = group.id;
        self.state.lock().unwrap().groups.push(group);
        id
    }

    /// Insert a membership row without any pair-uniqueness guard, the
    /// way legacy data produced duplicates.
    pub fn raw_link(&self, group_id: GroupId, user_id: UserId) -> LinkId {
        let id = LinkId::new();
        self.raw_link_with_id(id, group_id, user_id);
        id
    }

    /// Insert a membership row with a caller-chosen link id.
    pub fn raw_link_with_id(&self, id: LinkId, group_id: GroupId, user_id: UserId) {
        self.state.lock().unwrap().links.push(LinkRow {
            id,
            group_id,
            user_id,
        });
    }

    /// Make `delete_links` fail whenever the batch contains this id.
    pub fn poison_delete(&self, id: LinkId) {
        self.state.lock().unwrap().fail_on_delete.insert(id);
    }

    /// Clear all injected failures.
    pub fn heal_deletes(&self) {
        self.state.lock().unwrap().fail_on_delete.clear();
    }

    /// All link ids for a pair, sorted ascending.
    pub fn pair_links(&self, group_id: GroupId, user_id: UserId) -> Vec<LinkId> {
        let state = self.state.lock().unwrap();
        let mut ids: Vec<LinkId> = state
            .links
            .iter()
            .filter(|l| l.group_id == group_id && l.user_id == user_id)
            .map(|l| l.id)
            .collect();
        ids.sort();
        ids
    }

    /// Total number of membership rows.
    pub fn link_count(&self) -> usize {
        self.state.lock().unwrap().links.len()
    }

    /// Fetch a group snapshot by id.
    pub fn group(&self, id: GroupId) -> Option<Group> {
        let state = self.state.lock().unwrap();
        state.groups.iter().find(|g| g.id == id).cloned()
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn find_group_by_name(&self, name: &str) -> Result<Option<Group>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .groups
            .iter()
            .find(|g| g.name == name && g.trashed.is_none())
            .cloned())
    }

    async fn find_group_by_name_any(&self, name: &str) -> Result<Option<Group>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.groups.iter().find(|g| g.name == name).cloned())
    }

    async fn get_group(&self, id: GroupId) -> Result<Option<Group>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn list_linked_user_ids(&self, group_id: GroupId) -> Result<Vec<UserId>, DbError> {
        let state = self.state.lock().unwrap();
        let mut ids: Vec<UserId> = state
            .links
            .iter()
            .filter(|l| l.group_id == group_id)
            .map(|l| l.user_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn list_users_excluding(&self, exclude: &[UserId]) -> Result<Vec<UserId>, DbError> {
        let state = self.state.lock().unwrap();
        let mut ids: Vec<UserId> = state
            .users
            .iter()
            .filter(|id| !exclude.contains(id))
            .copied()
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn link(&self, group_id: GroupId, user_ids: &[UserId]) -> Result<u64, DbError> {
        let mut state = self.state.lock().unwrap();
        let mut inserted = 0;
        for &user_id in user_ids {
            let exists = state
                .links
                .iter()
                .any(|l| l.group_id == group_id && l.user_id == user_id);
            if !exists {
                state.links.push(LinkRow {
                    id: LinkId::new(),
                    group_id,
                    user_id,
                });
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn unlink(&self, group_id: GroupId, user_ids: &[UserId]) -> Result<u64, DbError> {
        let mut state = self.state.lock().unwrap();
        let before = state.links.len();
        state
            .links
            .retain(|l| !(l.group_id == group_id && user_ids.contains(&l.user_id)));
        Ok((before - state.links.len()) as u64)
    }

    async fn count_links(&self, group_id: GroupId, user_id: UserId) -> Result<i64, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .links
            .iter()
            .filter(|l| l.group_id == group_id && l.user_id == user_id)
            .count() as i64)
    }

    async fn list_duplicate_links(&self) -> Result<Vec<DuplicateLinks>, DbError> {
        let state = self.state.lock().unwrap();

        let mut pairs: Vec<(GroupId, UserId)> = state
            .links
            .iter()
            .map(|l| (l.group_id, l.user_id))
            .collect();
        pairs.sort();
        pairs.dedup();

        let mut result = Vec::new();
        for (group_id, user_id) in pairs {
            let mut ids: Vec<LinkId> = state
                .links
                .iter()
                .filter(|l| l.group_id == group_id && l.user_id == user_id)
                .map(|l| l.id)
                .collect();
            if ids.len() > 1 {
                ids.sort();
                result.push(DuplicateLinks {
                    group_id,
                    user_id,
                    link_ids: ids,
                });
            }
        }
        Ok(result)
    }

    async fn list_orphaned_links(&self) -> Result<Vec<LinkId>, DbError> {
        let state = self.state.lock().unwrap();
        let mut ids: Vec<LinkId> = state
            .links
            .iter()
            .filter(|l| {
                let group_exists = state.groups.iter().any(|g| g.id == l.group_id);
                let user_exists = state.users.contains(&l.user_id);
                !group_exists || !user_exists
            })
            .map(|l| l.id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn delete_links(&self, ids: &[LinkId]) -> Result<u64, DbError> {
        let mut state = self.state.lock().unwrap();
        if ids.iter().any(|id| state.fail_on_delete.contains(id)) {
            return Err(DbError::ValidationFailed("injected delete failure".to_string()));
        }
        let before = state.links.len();
        state.links.retain(|l| !ids.contains(&l.id));
        Ok((before - state.links.len()) as u64)
    }

    async fn insert_group(&self, new: &NewGroup) -> Result<Group, DbError> {
        let group = Group {
            id: GroupId::new(),
            name: new.name.clone(),
            deny_edit: new.deny_edit,
            deny_delete: new.deny_delete,
            trashed: None,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        };
        self.state.lock().unwrap().groups.push(group.clone());
        Ok(group)
    }

    async fn rename_group(&self, id: GroupId, name: &str) -> Result<Group, DbError> {
        let mut state = self.state.lock().unwrap();
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| DbError::NotFound(format!("group {id}")))?;
        group.name = name.to_string();
        group.modified_at = Utc::now();
        Ok(group.clone())
    }

    async fn soft_delete_group(&self, id: GroupId, at: DateTime<Utc>) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.id == id && g.trashed.is_none())
            .ok_or_else(|| DbError::NotFound(format!("active group {id}")))?;
        group.trashed = Some(at);
        group.modified_at = Utc::now();
        Ok(())
    }

    async fn restore_group(&self, id: GroupId) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.id == id && g.trashed.is_some())
            .ok_or_else(|| DbError::NotFound(format!("trashed group {id}")))?;
        group.trashed = None;
        group.modified_at = Utc::now();
        Ok(())
    }

    async fn list_user_groups(&self, user_id: UserId) -> Result<Vec<Group>, DbError> {
        let state = self.state.lock().unwrap();
        let mut groups: Vec<Group> = state
            .groups
            .iter()
            .filter(|g| {
                g.trashed.is_none()
                    && state
                        .links
                        .iter()
                        .any(|l| l.group_id == g.id && l.user_id == user_id)
            })
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }
}
