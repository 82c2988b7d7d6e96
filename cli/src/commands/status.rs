use crate::{output, settings};
use access::PresenceRegistrar;
use anyhow::Result;
use clap::Args;
use config::Config;
use site_core::{PersonId, SiteId};

#[derive(Args)]
pub struct StatusArgs {
    #[arg(help = "Site ID")]
    pub site: SiteId,

    #[arg(help = "Person ID")]
    pub person: PersonId,

    #[arg(long, help = "Output as JSON")]
    pub json: bool
}

pub async fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let store = settings::connect(config).await?;
    let registrar = PresenceRegistrar::from_store(store, &config.access);
    let presence = registrar.presence_state(args.site, args.person).await?;
    let decision = registrar.status(args.site, args.person).await?;

    if args.json {
        let output = serde_json::json!({
            "site_id": args.site,
            "person_id": args.person,
            "presence": presence,
            "decision": decision
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::header(&format!("Status of {} at {}", args.person, args.site));
    println!("  {:<10} {}", "Presence:", output::presence(presence));
    output::decision(&decision);
    Ok(())
}
