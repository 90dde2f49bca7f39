//! Default-group assignment command

use clap::Args;

use groupsync_db::PgMembershipStore;
use groupsync_recon::DefaultGroupAssigner;

use crate::config::{self, Config};
use crate::error::CliResult;

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the configured default group name
    #[arg(long)]
    pub group: Option<String>,
}

pub async fn execute(config: &Config, args: AssignArgs) -> CliResult<()> {
    let pool = config::connect(config).await?;
    let store = PgMembershipStore::new(pool);

    let default_group = args
        .group
        .as_deref()
        .or(config.default_group.as_deref());

    let report = DefaultGroupAssigner::new(&store).run(default_group).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(reason) = report.skipped {
        println!("Nothing to do: {reason}.");
    } else {
        println!("Linked {} user(s) to the default group.", report.linked);
    }

    Ok(())
}
