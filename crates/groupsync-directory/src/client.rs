//! Directory client.
//!
//! Stateless per call: each [`DirectoryClient::fetch_groups`] opens a
//! fresh connection, binds, searches, and unbinds. Nothing is cached
//! and nothing is retried here.

use ldap3::{LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use tracing::{debug, info, instrument, warn};

use crate::config::DirectorySettings;
use crate::error::DirectoryError;

/// LDAP bind result code for invalid credentials.
const RC_INVALID_CREDENTIALS: u32 = 49;

/// A raw directory entry: its distinguished name and `cn` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Distinguished name of the entry.
    pub dn: String,

    /// Common-name values. May be empty for malformed entries.
    pub cn: Vec<String>,
}

/// Client for the external group directory.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    settings: DirectorySettings,
}

impl DirectoryClient {
    /// Create a client, verifying the settings are complete.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::ConfigIncomplete`] if any required
    /// field is missing; no connection is attempted.
    pub fn new(settings: DirectorySettings) -> Result<Self, DirectoryError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Fetch raw group entries from the directory.
    ///
    /// Runs a single search bounded to the `cn` attribute under the
    /// configured base DN. Referral following is not performed and the
    /// connection attempt is bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Connection, bind and search failures each map to their own
    /// [`DirectoryError`] variant so operators can tell them apart.
    #[instrument(skip(self), fields(host = %self.settings.host))]
    pub async fn fetch_groups(&self) -> Result<Vec<RawEntry>, DirectoryError> {
        let url = self.settings.url();

        debug!(url = %url, "Connecting to directory server");

        let conn_settings = LdapConnSettings::new().set_conn_timeout(
            std::time::Duration::from_secs(self.settings.connect_timeout_secs),
        );

        // ldap3 does not chase referrals on its own, matching the
        // referrals-disabled contract of this client.
        let (conn, mut ldap) = LdapConnAsync::with_settings(conn_settings, &url)
            .await
            .map_err(|e| {
                DirectoryError::connect_failed(
                    format!("failed to connect to directory server at {url}"),
                    e,
                )
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "Directory connection driver error");
            }
        });

        let bind_name = self.settings.bind_name();
        let password = self.settings.password.as_deref().unwrap_or("");

        debug!(bind_name = %bind_name, "Performing directory bind");

        let bind = ldap
            .simple_bind(&bind_name, password)
            .await
            .map_err(|e| DirectoryError::BindFailed {
                message: format!("bind call failed for {bind_name}"),
                source: Some(e),
            })?;

        if bind.rc != 0 {
            let reason = if bind.rc == RC_INVALID_CREDENTIALS {
                format!("invalid credentials for {bind_name}")
            } else {
                format!("bind rejected with code {}: {}", bind.rc, bind.text)
            };
            return Err(DirectoryError::bind_rejected(reason));
        }

        debug!(
            base_dn = %self.settings.base_dn,
            filter = %self.settings.groups_filter,
            "Searching directory for groups"
        );

        let result = ldap
            .search(
                &self.settings.base_dn,
                Scope::Subtree,
                &self.settings.groups_filter,
                vec!["cn"],
            )
            .await
            .map_err(|e| DirectoryError::search_failed("group search call failed", e))?;

        let (entries, _res) = result.success().map_err(|e| DirectoryError::SearchFailed {
            message: format!("group search returned failure: {e}"),
            source: None,
        })?;

        if let Err(e) = ldap.unbind().await {
            warn!(error = %e, "Error during directory unbind");
        }

        let raw: Vec<RawEntry> = entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(|entry| RawEntry {
                cn: entry.attrs.get("cn").cloned().unwrap_or_default(),
                dn: entry.dn,
            })
            .collect();

        info!(count = raw.len(), "Directory group fetch completed");

        Ok(raw)
    }
}
