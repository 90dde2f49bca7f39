//! Remote directory group listing command

use clap::Args;

use groupsync_recon::RemoteGroupSync;

use crate::config::Config;
use crate::error::CliResult;

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(config: &Config, args: SyncArgs) -> CliResult<()> {
    let groups = RemoteGroupSync::new(config.remote_groups.clone())
        .run()
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else if groups.is_empty() {
        println!("No remote groups available.");
    } else {
        for group in &groups {
            println!("{:<40} {}", group.label, group.dn);
        }
        println!();
        println!("{} remote group(s)", groups.len());
    }

    Ok(())
}
