//! Database migration command

use clap::Args;

use crate::config::{self, Config};
use crate::error::CliResult;

#[derive(Args, Debug)]
pub struct MigrateArgs {}

pub async fn execute(config: &Config, _args: MigrateArgs) -> CliResult<()> {
    let pool = config::connect(config).await?;
    groupsync_db::run_migrations(&pool).await?;
    println!("Migrations applied.");
    Ok(())
}
