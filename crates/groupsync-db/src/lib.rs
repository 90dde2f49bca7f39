//! # groupsync-db
//!
//! Database models and persistence access for groupsync.
//!
//! This crate owns the `Group`, `User` and `GroupMembership` entities and
//! exposes the [`MembershipStore`] trait: the single seam through which the
//! reconciliation routines read and mutate membership state. A Postgres
//! implementation backed by `sqlx` is provided; tests supply their own
//! in-memory implementation.

pub mod error;
pub mod ids;
pub mod migrations;
pub mod models;
pub mod store;

pub use error::DbError;
pub use migrations::run_migrations;
pub use ids::{GroupId, LinkId, UserId};
pub use models::group::{Group, NewGroup};
pub use models::group_membership::{DuplicateLinks, GroupMembership};
pub use models::user::User;
pub use store::{MembershipStore, PgMembershipStore};

/// Connection pool type used throughout groupsync.
pub type DbPool = sqlx::PgPool;
