//! Default-group assignment.
//!
//! Ensures every user is linked to the configured default group. The
//! routine is idempotent: a second run immediately after a successful
//! one links nothing, and concurrent identical runs are safe because
//! the store's `link` is a no-op for pairs that already exist.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use groupsync_db::{DbError, MembershipStore};

/// Why an assignment run performed no writes.
///
/// Skip reasons are outcomes, not failures: the routine completed and
/// found nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No default group name is configured.
    NoDefaultConfigured,
    /// No active group carries the configured name.
    GroupNotFound,
    /// Every user is already linked to the default group.
    AllUsersAlreadyLinked,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::NoDefaultConfigured => "no default group configured",
            SkipReason::GroupNotFound => "default group not found",
            SkipReason::AllUsersAlreadyLinked => "all users already linked",
        };
        f.write_str(text)
    }
}

/// Outcome of a default-group assignment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignReport {
    /// Number of links created.
    pub linked: u64,

    /// Set when the run performed no writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

impl AssignReport {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            linked: 0,
            skipped: Some(reason),
        }
    }
}

/// Reconciliation routine linking every user to the default group.
pub struct DefaultGroupAssigner<'a> {
    store: &'a dyn MembershipStore,
}

impl<'a> DefaultGroupAssigner<'a> {
    /// Create an assigner over a membership store.
    #[must_use]
    pub fn new(store: &'a dyn MembershipStore) -> Self {
        Self { store }
    }

    /// Link all users missing the default group.
    ///
    /// `default_group_name` empty or unset skips the run. Only active
    /// groups are considered when resolving the name.
    ///
    /// # Errors
    ///
    /// Returns `DbError` only for store failures; empty-state outcomes
    /// surface as [`SkipReason`] in the report.
    #[instrument(skip(self))]
    pub async fn run(
        &self,
        default_group_name: Option<&str>,
    ) -> Result<AssignReport, DbError> {
        let Some(name) = default_group_name.filter(|n| !n.is_empty()) else {
            debug!("No default group configured, skipping assignment");
            return Ok(AssignReport::skipped(SkipReason::NoDefaultConfigured));
        };

        let Some(group) = self.store.find_group_by_name(name).await? else {
            info!(group = %name, "Default group not found, skipping assignment");
            return Ok(AssignReport::skipped(SkipReason::GroupNotFound));
        };

        let linked_ids = self.store.list_linked_user_ids(group.id).await?;
        let missing = self.store.list_users_excluding(&linked_ids).await?;

        if missing.is_empty() {
            debug!(group = %name, "All users already linked to default group");
            return Ok(AssignReport::skipped(SkipReason::AllUsersAlreadyLinked));
        }

        let linked = self.store.link(group.id, &missing).await?;

        info!(group = %name, linked, "Default group assignment completed");

        Ok(AssignReport {
            linked,
            skipped: None,
        })
    }
}
