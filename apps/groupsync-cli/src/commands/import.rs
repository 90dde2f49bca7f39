//! System-group seeding command

use clap::Args;
use serde::Serialize;
use tracing::info;

use groupsync_db::PgMembershipStore;
use groupsync_recon::{GroupLifecycleGuard, LifecycleError};

use crate::config::{self, Config};
use crate::error::CliResult;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ImportReport {
    created: Vec<String>,
    existing: Vec<String>,
}

pub async fn execute(config: &Config, args: ImportArgs) -> CliResult<()> {
    let pool = config::connect(config).await?;
    let store = PgMembershipStore::new(pool);
    let guard = GroupLifecycleGuard::new(&store);

    let mut report = ImportReport {
        created: Vec::new(),
        existing: Vec::new(),
    };

    // A name already taken (active or trashed) means the group was seeded
    // before; every other rejection aborts the import.
    for seed in &config.seed_groups {
        match guard.create(seed).await {
            Ok(group) => {
                info!(group = %group.name, "Created system group");
                report.created.push(group.name);
            }
            Err(LifecycleError::DuplicateName(name)) => report.existing.push(name),
            Err(e) => return Err(e.into()),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if config.seed_groups.is_empty() {
        println!("No seed groups configured.");
    } else {
        println!(
            "Created {} group(s), {} already present.",
            report.created.len(),
            report.existing.len()
        );
    }

    Ok(())
}
