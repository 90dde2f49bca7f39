//! Duplicate and orphaned link cleanup.
//!
//! Collapses every `(group, user)` pair with more than one membership
//! row down to exactly one, and removes rows whose group or user no
//! longer exists. Best-effort batch semantics: a deletion failure on
//! one pair never aborts processing of the others.

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use groupsync_db::{DbError, GroupId, MembershipStore, UserId};

/// A duplicate pair whose extra rows could not be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairFailure {
    pub group_id: GroupId,
    pub user_id: UserId,
    /// Rendered store error for the operator report.
    pub error: String,
}

/// Outcome of a cleanup run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Duplicate membership rows removed.
    pub removed: u64,

    /// Orphaned membership rows removed.
    pub orphaned: u64,

    /// Pairs whose cleanup failed; the rest of the run still counts.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<PairFailure>,
}

impl CleanupReport {
    /// Whether every pair was processed without failure.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reconciliation routine restoring pair uniqueness of the membership
/// relation.
pub struct DuplicateLinkCleaner<'a> {
    store: &'a dyn MembershipStore,
}

impl<'a> DuplicateLinkCleaner<'a> {
    /// Create a cleaner over a membership store.
    #[must_use]
    pub fn new(store: &'a dyn MembershipStore) -> Self {
        Self { store }
    }

    /// Remove duplicate and orphaned membership rows.
    ///
    /// For each duplicate pair the row with the lowest link id survives;
    /// the store returns candidates sorted ascending, so everything
    /// after the first is deleted. Pairs with a single row are never
    /// touched. Idempotent: a second run reports zero removals.
    ///
    /// # Errors
    ///
    /// Returns `DbError` only when the duplicate or orphan listing
    /// itself fails; per-pair deletion failures are collected into the
    /// report instead.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<CleanupReport, DbError> {
        let mut report = CleanupReport::default();

        for dup in self.store.list_duplicate_links().await? {
            // Lowest link id survives.
            let doomed = &dup.link_ids[1..];
            if doomed.is_empty() {
                continue;
            }

            match self.store.delete_links(doomed).await {
                Ok(n) => report.removed += n,
                Err(e) => {
                    warn!(
                        group_id = %dup.group_id,
                        user_id = %dup.user_id,
                        error = %e,
                        "Failed to remove duplicate links for pair"
                    );
                    report.failures.push(PairFailure {
                        group_id: dup.group_id,
                        user_id: dup.user_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        let orphans = self.store.list_orphaned_links().await?;
        if !orphans.is_empty() {
            match self.store.delete_links(&orphans).await {
                Ok(n) => report.orphaned = n,
                Err(e) => {
                    // Orphans will be picked up again on the next run.
                    error!(count = orphans.len(), error = %e, "Failed to remove orphaned links");
                }
            }
        }

        info!(
            removed = report.removed,
            orphaned = report.orphaned,
            failures = report.failures.len(),
            "Membership cleanup completed"
        );

        Ok(report)
    }
}
