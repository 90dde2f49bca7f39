//! Remote-group sync orchestration.
//!
//! Refreshes the directory-group listing used for display and
//! selection. Directory failures never propagate past this point: they
//! are logged at error level and resolve to an empty listing, so the
//! rest of the system keeps running without remote groups.

use tracing::{debug, error, instrument};

use groupsync_directory::{normalize, DirectoryClient, RemoteGroup, RemoteGroupsConfig};

/// Fetches and normalizes the remote group listing.
pub struct RemoteGroupSync {
    config: RemoteGroupsConfig,
}

impl RemoteGroupSync {
    /// Create a sync routine from the remote-groups configuration.
    #[must_use]
    pub fn new(config: RemoteGroupsConfig) -> Self {
        Self { config }
    }

    /// Fetch the current remote group listing, label-sorted.
    ///
    /// Returns an empty listing when either enable flag is off, when the
    /// directory configuration is incomplete, or when any directory call
    /// fails. Nothing is cached between invocations.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Vec<RemoteGroup> {
        if !self.config.enabled {
            debug!("Remote groups disabled, skipping directory sync");
            return Vec::new();
        }
        if !self.config.ldap.enabled {
            debug!("LDAP backend disabled, skipping directory sync");
            return Vec::new();
        }

        let client = match DirectoryClient::new(self.config.ldap.clone()) {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Directory configuration rejected, no remote groups available");
                return Vec::new();
            }
        };

        match client.fetch_groups().await {
            Ok(entries) => normalize(&entries),
            Err(e) => {
                error!(error = %e, "Directory group fetch failed, no remote groups available");
                Vec::new()
            }
        }
    }
}
