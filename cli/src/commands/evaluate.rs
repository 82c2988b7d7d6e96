use crate::{output, settings};
use access::AccessEngine;
use anyhow::Result;
use clap::Args;
use config::Config;
use site_core::{PersonId, SiteId};

#[derive(Args)]
pub struct EvaluateArgs {
    #[arg(help = "Site ID")]
    pub site: SiteId,

    #[arg(help = "Person ID")]
    pub person: PersonId,

    #[arg(long, help = "Output as JSON")]
    pub json: bool
}

pub async fn run(args: EvaluateArgs, config: &Config) -> Result<()> {
    let store = settings::connect(config).await?;
    let engine = AccessEngine::from_store(store, &config.access);
    let decision = engine.evaluate_access(args.site, args.person).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    output::header(&format!("Access for {} at {}", args.person, args.site));
    output::decision(&decision);
    Ok(())
}
