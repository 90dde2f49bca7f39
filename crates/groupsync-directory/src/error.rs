//! Directory error types.
//!
//! All variants are non-fatal to the host process: callers log them and
//! treat the lookup as having returned no remote groups.

use thiserror::Error;

/// Errors from directory configuration and lookups.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// One or more required configuration fields are missing. No
    /// connection is attempted in this state.
    #[error("Directory configuration incomplete: missing {}", missing.join(", "))]
    ConfigIncomplete { missing: Vec<&'static str> },

    /// Could not reach the directory server.
    #[error("Failed to connect to directory server: {message}")]
    ConnectFailed {
        message: String,
        #[source]
        source: Option<ldap3::LdapError>,
    },

    /// The server rejected the bind credentials or the bind call failed.
    #[error("Directory bind failed: {message}")]
    BindFailed {
        message: String,
        #[source]
        source: Option<ldap3::LdapError>,
    },

    /// The group search failed after a successful bind.
    #[error("Directory search failed: {message}")]
    SearchFailed {
        message: String,
        #[source]
        source: Option<ldap3::LdapError>,
    },
}

impl DirectoryError {
    /// Connection failure with an underlying ldap3 error.
    pub fn connect_failed(message: impl Into<String>, source: ldap3::LdapError) -> Self {
        DirectoryError::ConnectFailed {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Bind failure from a result code rather than a transport error.
    pub fn bind_rejected(message: impl Into<String>) -> Self {
        DirectoryError::BindFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Search failure with an underlying ldap3 error.
    pub fn search_failed(message: impl Into<String>, source: ldap3::LdapError) -> Self {
        DirectoryError::SearchFailed {
            message: message.into(),
            source: Some(source),
        }
    }
}
