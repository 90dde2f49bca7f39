//! # Membership Reconciliation
//!
//! Idempotent batch routines that bring group membership back into a
//! consistent, invariant-satisfying state.
//!
//! ## Overview
//!
//! - [`DefaultGroupAssigner`] links every user lacking the configured
//!   default group.
//! - [`DuplicateLinkCleaner`] collapses duplicate `(group, user)` links
//!   down to exactly one row each and removes orphaned links.
//! - [`GroupLifecycleGuard`] enforces name uniqueness, soft-delete
//!   semantics and system-group protection at the mutation boundary.
//! - [`RemoteGroupSync`] refreshes the directory-group listing, treating
//!   any directory failure as an empty result.
//!
//! The routines are independent, safe to run in any interleaving, and
//! re-runnable: each operates read-then-batch-write against the
//! [`MembershipStore`](groupsync_db::MembershipStore) seam rather than
//! holding long transactions.

pub mod assign;
pub mod cleanup;
pub mod lifecycle;
pub mod sync;

pub use assign::{AssignReport, DefaultGroupAssigner, SkipReason};
pub use cleanup::{CleanupReport, DuplicateLinkCleaner, PairFailure};
pub use lifecycle::{GroupLifecycleGuard, LifecycleError, ProtectedAction};
pub use sync::RemoteGroupSync;
