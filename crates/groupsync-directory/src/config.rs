//! Directory connection configuration.

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

/// Remote-group subsystem configuration.
///
/// Two independent switches gate directory lookups: the remote-groups
/// feature as a whole, and the LDAP backend within it. Both must be on
/// for a sync to reach the network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteGroupsConfig {
    /// Remote-group feature switch.
    #[serde(default)]
    pub enabled: bool,

    /// LDAP backend settings.
    #[serde(default)]
    pub ldap: DirectorySettings,
}

/// Connection settings for the LDAP group source.
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectorySettings {
    /// LDAP backend switch.
    #[serde(default)]
    pub enabled: bool,

    /// Directory server hostname or IP address.
    #[serde(default)]
    pub host: String,

    /// Directory server port (389 for LDAP, 636 for LDAPS).
    #[serde(default)]
    pub port: u16,

    /// LDAP protocol version. Only version 3 is spoken on the wire.
    #[serde(default = "default_version")]
    pub version: u8,

    /// Bind domain; the bind name sent is `domain\username`.
    #[serde(default)]
    pub domain: String,

    /// Bind username.
    #[serde(default)]
    pub username: String,

    /// Bind password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Base DN under which groups are searched.
    #[serde(default)]
    pub base_dn: String,

    /// LDAP filter selecting group entries.
    #[serde(default)]
    pub groups_filter: String,

    /// Network timeout for the connection attempt, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_version() -> u8 {
    3
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            port: 0,
            version: default_version(),
            domain: String::new(),
            username: String::new(),
            password: None,
            base_dn: String::new(),
            groups_filter: String::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DirectorySettings {
    /// The bind DN in the domain-qualified form the server expects.
    #[must_use]
    pub fn bind_name(&self) -> String {
        format!("{}\\{}", self.domain, self.username)
    }

    /// The LDAP URL for this server.
    #[must_use]
    pub fn url(&self) -> String {
        format!("ldap://{}:{}", self.host, self.port)
    }

    /// Verify every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::ConfigIncomplete`] naming all missing
    /// fields; callers must not attempt a connection in that case.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        let mut missing = Vec::new();

        if self.host.is_empty() {
            missing.push("host");
        }
        if self.port == 0 {
            missing.push("port");
        }
        if self.version == 0 {
            missing.push("version");
        }
        if self.domain.is_empty() {
            missing.push("domain");
        }
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.password.as_deref().is_none_or(str::is_empty) {
            missing.push("password");
        }
        if self.base_dn.is_empty() {
            missing.push("base_dn");
        }
        if self.groups_filter.is_empty() {
            missing.push("groups_filter");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DirectoryError::ConfigIncomplete { missing })
        }
    }
}

impl std::fmt::Debug for DirectorySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorySettings")
            .field("enabled", &self.enabled)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("version", &self.version)
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***REDACTED***"))
            .field("base_dn", &self.base_dn)
            .field("groups_filter", &self.groups_filter)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}
