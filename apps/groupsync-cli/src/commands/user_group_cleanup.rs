//! Membership link cleanup command

use clap::Args;

use groupsync_db::PgMembershipStore;
use groupsync_recon::DuplicateLinkCleaner;

use crate::config::{self, Config};
use crate::error::CliResult;

#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(config: &Config, args: CleanupArgs) -> CliResult<()> {
    let pool = config::connect(config).await?;
    let store = PgMembershipStore::new(pool);

    let report = DuplicateLinkCleaner::new(&store).run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Removed {} duplicate and {} orphaned link(s).",
        report.removed, report.orphaned
    );

    if !report.is_clean() {
        println!("{} pair(s) could not be cleaned:", report.failures.len());
        for failure in &report.failures {
            println!(
                "  group {} / user {}: {}",
                failure.group_id, failure.user_id, failure.error
            );
        }
    }

    Ok(())
}
