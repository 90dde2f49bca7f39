//! Group membership entity model.
//!
//! Many-to-many join between groups and users. The schema does not
//! enforce pair uniqueness (legacy data contained duplicate links), so
//! [`GroupMembership::link_missing`] inserts with a not-exists guard and
//! the cleanup routine collapses any duplicates that slip through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::ids::{GroupId, LinkId, UserId};

/// A membership row linking a user to a group.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GroupMembership {
    /// Unique identifier for the membership row.
    pub id: LinkId,

    /// The group ID.
    pub group_id: GroupId,

    /// The user ID.
    pub user_id: UserId,

    /// When the membership was created.
    pub created_at: DateTime<Utc>,
}

/// A `(group, user)` pair holding more than one membership row.
///
/// `link_ids` is sorted ascending; the first entry is the survivor under
/// the lowest-id tie-break rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateLinks {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub link_ids: Vec<LinkId>,
}

impl GroupMembership {
    /// List ids of users linked to a group.
    pub async fn list_user_ids(
        pool: &sqlx::PgPool,
        group_id: GroupId,
    ) -> Result<Vec<UserId>, sqlx::Error> {
        let rows: Vec<(UserId,)> = sqlx::query_as(
            r"
            SELECT DISTINCT user_id FROM groups_users
            WHERE group_id = $1
            ORDER BY user_id
            ",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Link users to a group, skipping pairs that already exist.
    ///
    /// Returns the number of rows inserted. Safe to call concurrently
    /// with itself: the not-exists guard runs inside the insert
    /// statement, so two racing calls cannot both insert the same pair
    /// within one statement's snapshot.
    pub async fn link_missing(
        pool: &sqlx::PgPool,
        group_id: GroupId,
        user_ids: &[UserId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r"
            INSERT INTO groups_users (group_id, user_id)
            SELECT $1, u.id
            FROM UNNEST($2::uuid[]) AS u(id)
            WHERE NOT EXISTS (
                SELECT 1 FROM groups_users
                WHERE group_id = $1 AND user_id = u.id
            )
            ",
        )
        .bind(group_id)
        .bind(user_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Remove all membership rows for the given users in a group.
    pub async fn unlink(
        pool: &sqlx::PgPool,
        group_id: GroupId,
        user_ids: &[UserId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r"
            DELETE FROM groups_users
            WHERE group_id = $1 AND user_id = ANY($2)
            ",
        )
        .bind(group_id)
        .bind(user_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Count membership rows for one `(group, user)` pair.
    pub async fn count_pair(
        pool: &sqlx::PgPool,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM groups_users
            WHERE group_id = $1 AND user_id = $2
            ",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }

    /// Find every `(group, user)` pair with more than one membership row.
    pub async fn duplicates(pool: &sqlx::PgPool) -> Result<Vec<DuplicateLinks>, sqlx::Error> {
        let rows: Vec<(GroupId, UserId, Vec<LinkId>)> = sqlx::query_as(
            r"
            SELECT group_id, user_id, ARRAY_AGG(id ORDER BY id) AS link_ids
            FROM groups_users
            GROUP BY group_id, user_id
            HAVING COUNT(*) > 1
            ORDER BY group_id, user_id
            ",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(group_id, user_id, link_ids)| DuplicateLinks {
                group_id,
                user_id,
                link_ids,
            })
            .collect())
    }

    /// Find membership rows whose group or user no longer exists.
    pub async fn orphans(pool: &sqlx::PgPool) -> Result<Vec<LinkId>, sqlx::Error> {
        let rows: Vec<(LinkId,)> = sqlx::query_as(
            r"
            SELECT gu.id FROM groups_users gu
            LEFT JOIN groups g ON g.id = gu.group_id
            LEFT JOIN users u ON u.id = gu.user_id
            WHERE g.id IS NULL OR u.id IS NULL
            ORDER BY gu.id
            ",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Delete membership rows by id.
    pub async fn delete_by_ids(
        pool: &sqlx::PgPool,
        ids: &[LinkId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r"
            DELETE FROM groups_users
            WHERE id = ANY($1)
            ",
        )
        .bind(ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_duplicate_links_survivor_is_first() {
        let dup = DuplicateLinks {
            group_id: GroupId::new(),
            user_id: UserId::from(Uuid::new_v4()),
            link_ids: vec![
                LinkId(Uuid::from_u128(1)),
                LinkId(Uuid::from_u128(2)),
                LinkId(Uuid::from_u128(3)),
            ],
        };

        let survivor = dup.link_ids.first().copied().unwrap();
        assert_eq!(survivor, LinkId(Uuid::from_u128(1)));
        assert_eq!(&dup.link_ids[1..], &[
            LinkId(Uuid::from_u128(2)),
            LinkId(Uuid::from_u128(3)),
        ]);
    }
}
