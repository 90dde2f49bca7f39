//! The membership store seam.
//!
//! Reconciliation routines consume persistence exclusively through the
//! [`MembershipStore`] trait. Every operation is transactional at the
//! single-call granularity; no multi-call atomicity is promised, so
//! callers are written to be safely re-runnable instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DbError;
use crate::ids::{GroupId, LinkId, UserId};
use crate::models::group::{Group, NewGroup};
use crate::models::group_membership::{DuplicateLinks, GroupMembership};
use crate::models::user::User;
use crate::DbPool;

/// Persistence operations over groups, users and their links.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Find an active group by exact name.
    async fn find_group_by_name(&self, name: &str) -> Result<Option<Group>, DbError>;

    /// Find a group by exact name, trashed rows included.
    async fn find_group_by_name_any(&self, name: &str) -> Result<Option<Group>, DbError>;

    /// Fetch a group by id, trashed rows included.
    async fn get_group(&self, id: GroupId) -> Result<Option<Group>, DbError>;

    /// Ids of users linked to a group.
    async fn list_linked_user_ids(&self, group_id: GroupId) -> Result<Vec<UserId>, DbError>;

    /// All user ids not in the given set; the full set if it is empty.
    async fn list_users_excluding(&self, exclude: &[UserId]) -> Result<Vec<UserId>, DbError>;

    /// Link users to a group. A no-op for pairs that already exist;
    /// returns the number of links actually created.
    async fn link(&self, group_id: GroupId, user_ids: &[UserId]) -> Result<u64, DbError>;

    /// Remove all links between a group and the given users.
    async fn unlink(&self, group_id: GroupId, user_ids: &[UserId]) -> Result<u64, DbError>;

    /// Number of membership rows for one `(group, user)` pair.
    async fn count_links(&self, group_id: GroupId, user_id: UserId) -> Result<i64, DbError>;

    /// Every pair with more than one membership row, candidate ids
    /// sorted ascending.
    async fn list_duplicate_links(&self) -> Result<Vec<DuplicateLinks>, DbError>;

    /// Membership rows whose group or user row no longer exists.
    async fn list_orphaned_links(&self) -> Result<Vec<LinkId>, DbError>;

    /// Delete membership rows by id; returns the number removed.
    async fn delete_links(&self, ids: &[LinkId]) -> Result<u64, DbError>;

    /// Insert a new group.
    async fn insert_group(&self, new: &NewGroup) -> Result<Group, DbError>;

    /// Rename a group.
    async fn rename_group(&self, id: GroupId, name: &str) -> Result<Group, DbError>;

    /// Soft-delete a group by stamping `trashed`.
    async fn soft_delete_group(&self, id: GroupId, at: DateTime<Utc>) -> Result<(), DbError>;

    /// Clear a group's `trashed` marker.
    async fn restore_group(&self, id: GroupId) -> Result<(), DbError>;

    /// Active groups a user belongs to, ordered by name.
    async fn list_user_groups(&self, user_id: UserId) -> Result<Vec<Group>, DbError>;
}

/// Postgres-backed [`MembershipStore`].
#[derive(Debug, Clone)]
pub struct PgMembershipStore {
    pool: DbPool,
}

impl PgMembershipStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn find_group_by_name(&self, name: &str) -> Result<Option<Group>, DbError> {
        Group::find_by_name(&self.pool, name)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn find_group_by_name_any(&self, name: &str) -> Result<Option<Group>, DbError> {
        Group::find_by_name_any(&self.pool, name)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn get_group(&self, id: GroupId) -> Result<Option<Group>, DbError> {
        Group::get(&self.pool, id)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn list_linked_user_ids(&self, group_id: GroupId) -> Result<Vec<UserId>, DbError> {
        GroupMembership::list_user_ids(&self.pool, group_id)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn list_users_excluding(&self, exclude: &[UserId]) -> Result<Vec<UserId>, DbError> {
        User::list_ids_excluding(&self.pool, exclude)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn link(&self, group_id: GroupId, user_ids: &[UserId]) -> Result<u64, DbError> {
        GroupMembership::link_missing(&self.pool, group_id, user_ids)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn unlink(&self, group_id: GroupId, user_ids: &[UserId]) -> Result<u64, DbError> {
        GroupMembership::unlink(&self.pool, group_id, user_ids)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn count_links(&self, group_id: GroupId, user_id: UserId) -> Result<i64, DbError> {
        GroupMembership::count_pair(&self.pool, group_id, user_id)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn list_duplicate_links(&self) -> Result<Vec<DuplicateLinks>, DbError> {
        GroupMembership::duplicates(&self.pool)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn list_orphaned_links(&self) -> Result<Vec<LinkId>, DbError> {
        GroupMembership::orphans(&self.pool)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn delete_links(&self, ids: &[LinkId]) -> Result<u64, DbError> {
        GroupMembership::delete_by_ids(&self.pool, ids)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn insert_group(&self, new: &NewGroup) -> Result<Group, DbError> {
        Group::insert(&self.pool, new)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn rename_group(&self, id: GroupId, name: &str) -> Result<Group, DbError> {
        Group::rename(&self.pool, id, name)
            .await
            .map_err(DbError::QueryFailed)?
            .ok_or_else(|| DbError::NotFound(format!("group {id}")))
    }

    async fn soft_delete_group(&self, id: GroupId, at: DateTime<Utc>) -> Result<(), DbError> {
        let updated = Group::set_trashed(&self.pool, id, at)
            .await
            .map_err(DbError::QueryFailed)?;
        if updated {
            Ok(())
        } else {
            Err(DbError::NotFound(format!("active group {id}")))
        }
    }

    async fn restore_group(&self, id: GroupId) -> Result<(), DbError> {
        let updated = Group::clear_trashed(&self.pool, id)
            .await
            .map_err(DbError::QueryFailed)?;
        if updated {
            Ok(())
        } else {
            Err(DbError::NotFound(format!("trashed group {id}")))
        }
    }

    async fn list_user_groups(&self, user_id: UserId) -> Result<Vec<Group>, DbError> {
        Group::list_for_user(&self.pool, user_id)
            .await
            .map_err(DbError::QueryFailed)
    }
}
