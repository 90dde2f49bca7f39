//! CLI command implementations

pub mod assign;
pub mod import;
pub mod migrate;
pub mod sync_ldap_groups;
pub mod user_group_cleanup;
