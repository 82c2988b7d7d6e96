use crate::{output, settings};
use anyhow::Result;
use clap::Args;
use config::Config;

#[derive(Args)]
pub struct MigrateArgs {}

pub async fn run(_args: MigrateArgs, config: &Config) -> Result<()> {
    let store = settings::connect(config).await?;
    store.initialize_schema().await?;
    output::success(&format!(
        "Schema ready in database {}",
        config.database.database
    ));
    Ok(())
}
