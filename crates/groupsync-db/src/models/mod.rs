//! Entity models backed by sqlx.

pub mod group;
pub mod group_membership;
pub mod user;
