//! User entity model.
//!
//! Users are owned by an external user-management system; groupsync only
//! stores the id it links memberships against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::ids::UserId;

/// An opaque user reference.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// When the user row was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// List all user ids, excluding the given set.
    ///
    /// An empty exclusion set returns every user.
    pub async fn list_ids_excluding(
        pool: &sqlx::PgPool,
        exclude: &[UserId],
    ) -> Result<Vec<UserId>, sqlx::Error> {
        let rows: Vec<(UserId,)> = sqlx::query_as(
            r"
            SELECT id FROM users
            WHERE id != ALL($1)
            ORDER BY id
            ",
        )
        .bind(exclude)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Whether a user row exists.
    pub async fn exists(pool: &sqlx::PgPool, id: UserId) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            r"
            SELECT 1 FROM users WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.is_some())
    }
}
