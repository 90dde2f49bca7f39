//! Configuration for the groupsync CLI.
//!
//! Settings come from a TOML file; the database URL and directory bind
//! password may be supplied or overridden through the environment so
//! secrets can stay out of the file.

use std::path::Path;

use serde::Deserialize;

use groupsync_db::NewGroup;
use groupsync_directory::RemoteGroupsConfig;

use crate::error::{CliError, CliResult};

/// Environment variable overriding `database_url`.
const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Environment variable overriding the directory bind password.
const ENV_LDAP_PASSWORD: &str = "GROUPSYNC_LDAP_PASSWORD";

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Postgres connection string. `DATABASE_URL` takes precedence.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Name of the group every user should belong to. Unset disables
    /// default-group assignment.
    #[serde(default)]
    pub default_group: Option<String>,

    /// System groups seeded by the `import` subcommand.
    #[serde(default)]
    pub seed_groups: Vec<NewGroup>,

    /// Remote-group (directory) subsystem configuration.
    #[serde(default)]
    pub remote_groups: RemoteGroupsConfig,
}

impl Config {
    /// Load configuration from a TOML file and apply env overrides.
    ///
    /// A missing file yields the default configuration so commands that
    /// need no settings (or pure env configuration) still run.
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
            toml::from_str(&raw)
                .map_err(|e| CliError::Config(format!("invalid config {}: {e}", path.display())))?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var(ENV_DATABASE_URL) {
            config.database_url = Some(url);
        }
        if let Ok(password) = std::env::var(ENV_LDAP_PASSWORD) {
            config.remote_groups.ldap.password = Some(password);
        }

        Ok(config)
    }

    /// The database URL, required by the db-backed subcommands.
    pub fn database_url(&self) -> CliResult<&str> {
        self.database_url.as_deref().ok_or_else(|| {
            CliError::Config(
                "database_url is not set (config file or DATABASE_URL)".to_string(),
            )
        })
    }
}

/// Connect a pool for the db-backed subcommands.
pub async fn connect(config: &Config) -> CliResult<groupsync_db::DbPool> {
    let url = config.database_url()?;
    groupsync_db::DbPool::connect(url)
        .await
        .map_err(|e| CliError::Database(groupsync_db::DbError::ConnectionFailed(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            database_url = "postgres://localhost/groupsync"
            default_group = "Everyone"

            [[seed_groups]]
            name = "Admins"
            deny_edit = true
            deny_delete = true

            [[seed_groups]]
            name = "Everyone"

            [remote_groups]
            enabled = true

            [remote_groups.ldap]
            enabled = true
            host = "dc01.corp.example.com"
            port = 389
            domain = "CORP"
            username = "svc-groupsync"
            password = "secret"
            base_dn = "DC=corp,DC=example,DC=com"
            groups_filter = "(objectClass=group)"
        "#;

        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.default_group.as_deref(), Some("Everyone"));
        assert_eq!(config.seed_groups.len(), 2);
        assert!(config.seed_groups[0].deny_delete);
        assert!(!config.seed_groups[1].deny_edit);
        assert!(config.remote_groups.enabled);
        assert_eq!(config.remote_groups.ldap.version, 3);
        assert_eq!(config.remote_groups.ldap.connect_timeout_secs, 5);
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.default_group.is_none());
        assert!(config.seed_groups.is_empty());
        assert!(!config.remote_groups.enabled);
    }
}
