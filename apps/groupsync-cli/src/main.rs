//! groupsync CLI - membership reconciliation for the groups service
//!
//! Subcommands map one-to-one to the maintenance routines:
//! - Link every user to the configured default group
//! - Seed the system groups from configuration
//! - Collapse duplicate and orphaned membership links
//! - Fetch the remote directory group listing
//! - Apply pending database migrations

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use config::Config;
use error::CliResult;

/// groupsync CLI - group membership maintenance
#[derive(Parser)]
#[command(name = "groupsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "groupsync.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link every user to the configured default group
    Assign(commands::assign::AssignArgs),

    /// Create the configured system groups if missing
    Import(commands::import::ImportArgs),

    /// Remove duplicate and orphaned membership links
    UserGroupCleanup(commands::user_group_cleanup::CleanupArgs),

    /// Fetch and print the remote directory group listing
    SyncLdapGroups(commands::sync_ldap_groups::SyncArgs),

    /// Apply pending database migrations
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Assign(args) => commands::assign::execute(&config, args).await,
        Commands::Import(args) => commands::import::execute(&config, args).await,
        Commands::UserGroupCleanup(args) => {
            commands::user_group_cleanup::execute(&config, args).await
        }
        Commands::SyncLdapGroups(args) => commands::sync_ldap_groups::execute(&config, args).await,
        Commands::Migrate(args) => commands::migrate::execute(&config, args).await,
    }
}
