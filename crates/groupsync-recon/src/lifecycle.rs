//! Group lifecycle guard.
//!
//! Every group mutation passes through here so the invariants live in
//! one place: global name uniqueness (trashed rows included), soft
//! deletion via the `trashed` timestamp, and immutability of system
//! groups flagged `deny_edit` / `deny_delete`.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument};

use groupsync_db::{DbError, Group, GroupId, MembershipStore, NewGroup};

/// The mutation a protected group refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedAction {
    Edit,
    Delete,
}

impl std::fmt::Display for ProtectedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtectedAction::Edit => f.write_str("edit"),
            ProtectedAction::Delete => f.write_str("delete"),
        }
    }
}

/// Rejections raised at the group mutation boundary.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Another group already carries the target name, in any trashed
    /// state.
    #[error("group name '{0}' is already in use")]
    DuplicateName(String),

    /// The group is a system group and refuses this mutation.
    #[error("group '{name}' is protected: {action} denied")]
    ProtectedGroup {
        name: String,
        action: ProtectedAction,
    },

    /// Group names must be non-empty.
    #[error("group name must not be empty")]
    EmptyName,

    /// The group does not exist.
    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] DbError),
}

/// Guard enforcing group invariants on create, rename, delete and
/// restore.
pub struct GroupLifecycleGuard<'a> {
    store: &'a dyn MembershipStore,
}

impl<'a> GroupLifecycleGuard<'a> {
    /// Create a guard over a membership store.
    #[must_use]
    pub fn new(store: &'a dyn MembershipStore) -> Self {
        Self { store }
    }

    /// Create a group after checking name validity and uniqueness.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::DuplicateName`] if any group, trashed or not,
    /// already has the name.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: &NewGroup) -> Result<Group, LifecycleError> {
        self.check_name_free(&new.name, None).await?;

        let group = self.store.insert_group(new).await?;
        info!(group_id = %group.id, name = %group.name, "Group created");
        Ok(group)
    }

    /// Rename a group.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::ProtectedGroup`] when `deny_edit` is set;
    /// [`LifecycleError::DuplicateName`] when another group holds the
    /// target name, regardless of its trashed state.
    #[instrument(skip(self))]
    pub async fn rename(&self, id: GroupId, new_name: &str) -> Result<Group, LifecycleError> {
        let group = self.require_group(id).await?;
        if group.deny_edit {
            return Err(LifecycleError::ProtectedGroup {
                name: group.name,
                action: ProtectedAction::Edit,
            });
        }

        self.check_name_free(new_name, Some(id)).await?;

        let renamed = self.store.rename_group(id, new_name).await?;
        info!(group_id = %id, name = %renamed.name, "Group renamed");
        Ok(renamed)
    }

    /// Soft-delete a group by stamping `trashed` with the current time.
    /// The row and its membership links remain until explicitly
    /// cleaned.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::ProtectedGroup`] when `deny_delete` is set;
    /// `trashed` stays NULL in that case.
    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: GroupId) -> Result<(), LifecycleError> {
        let group = self.require_group(id).await?;
        if group.deny_delete {
            return Err(LifecycleError::ProtectedGroup {
                name: group.name,
                action: ProtectedAction::Delete,
            });
        }

        self.store.soft_delete_group(id, Utc::now()).await?;
        info!(group_id = %id, name = %group.name, "Group soft-deleted");
        Ok(())
    }

    /// Restore a soft-deleted group, re-checking name uniqueness.
    #[instrument(skip(self))]
    pub async fn restore(&self, id: GroupId) -> Result<(), LifecycleError> {
        let group = self.require_group(id).await?;

        self.check_name_free(&group.name, Some(id)).await?;

        self.store.restore_group(id).await?;
        info!(group_id = %id, name = %group.name, "Group restored");
        Ok(())
    }

    async fn require_group(&self, id: GroupId) -> Result<Group, LifecycleError> {
        self.store
            .get_group(id)
            .await?
            .ok_or(LifecycleError::GroupNotFound(id))
    }

    /// Global uniqueness check: trashed rows count, and a group may keep
    /// its own name.
    async fn check_name_free(
        &self,
        name: &str,
        current: Option<GroupId>,
    ) -> Result<(), LifecycleError> {
        if name.is_empty() {
            return Err(LifecycleError::EmptyName);
        }

        if let Some(existing) = self.store.find_group_by_name_any(name).await? {
            if current != Some(existing.id) {
                return Err(LifecycleError::DuplicateName(name.to_string()));
            }
        }

        Ok(())
    }
}
