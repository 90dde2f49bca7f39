//! Group entity model.
//!
//! Groups support soft deletion: a non-NULL `trashed` timestamp marks a
//! group inactive without removing its row (or its membership links,
//! which persist until explicitly cleaned).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::ids::{GroupId, UserId};

/// A group of users.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier for the group.
    pub id: GroupId,

    /// Group name, unique across all groups regardless of trashed state.
    pub name: String,

    /// When true the group cannot be edited (system group).
    pub deny_edit: bool,

    /// When true the group cannot be deleted (system group).
    pub deny_delete: bool,

    /// Soft-delete marker. NULL means active.
    pub trashed: Option<DateTime<Utc>>,

    /// When the group was created.
    pub created_at: DateTime<Utc>,

    /// When the group was last modified.
    pub modified_at: DateTime<Utc>,
}

/// Fields for creating a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub deny_edit: bool,
    #[serde(default)]
    pub deny_delete: bool,
}

impl Group {
    /// Whether the group is active (not soft-deleted).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.trashed.is_none()
    }

    /// Find an active group by exact name.
    pub async fn find_by_name(
        pool: &sqlx::PgPool,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM groups
            WHERE name = $1 AND trashed IS NULL
            ",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Find a group by exact name, including trashed rows.
    ///
    /// Used for the global name-uniqueness check.
    pub async fn find_by_name_any(
        pool: &sqlx::PgPool,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM groups
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Fetch a group by id, including trashed rows.
    pub async fn get(pool: &sqlx::PgPool, id: GroupId) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM groups
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Insert a new group.
    pub async fn insert(pool: &sqlx::PgPool, new: &NewGroup) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO groups (name, deny_edit, deny_delete)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(&new.name)
        .bind(new.deny_edit)
        .bind(new.deny_delete)
        .fetch_one(pool)
        .await
    }

    /// Rename a group.
    pub async fn rename(
        pool: &sqlx::PgPool,
        id: GroupId,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE groups
            SET name = $2, modified_at = NOW()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Soft-delete a group by setting its trashed timestamp.
    pub async fn set_trashed(
        pool: &sqlx::PgPool,
        id: GroupId,
        at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE groups
            SET trashed = $2, modified_at = NOW()
            WHERE id = $1 AND trashed IS NULL
            ",
        )
        .bind(id)
        .bind(at)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted group.
    pub async fn clear_trashed(pool: &sqlx::PgPool, id: GroupId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE groups
            SET trashed = NULL, modified_at = NOW()
            WHERE id = $1 AND trashed IS NOT NULL
            ",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get all active groups a user belongs to, ordered by name.
    pub async fn list_for_user(
        pool: &sqlx::PgPool,
        user_id: UserId,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT g.*
            FROM groups g
            JOIN groups_users gu ON gu.group_id = g.id
            WHERE gu.user_id = $1 AND g.trashed IS NULL
            ORDER BY g.name
            ",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        let group = Group {
            id: GroupId::new(),
            name: "Everyone".to_string(),
            deny_edit: false,
            deny_delete: false,
            trashed: None,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        };
        assert!(group.is_active());

        let trashed = Group {
            trashed: Some(Utc::now()),
            ..group
        };
        assert!(!trashed.is_active());
    }

    #[test]
    fn test_new_group_deserialize_defaults() {
        let new: NewGroup = serde_json::from_str(r#"{"name": "Admins"}"#).unwrap();
        assert_eq!(new.name, "Admins");
        assert!(!new.deny_edit);
        assert!(!new.deny_delete);
    }
}
