use crate::{output, settings};
use access::PresenceRegistrar;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use config::Config;
use site_core::{PersonId, PresenceEventKind, SiteId};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EventKind {
    CheckIn,
    CheckOut,
    Seen
}

impl From<EventKind> for PresenceEventKind {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::CheckIn => PresenceEventKind::CheckIn,
            EventKind::CheckOut => PresenceEventKind::CheckOut,
            EventKind::Seen => PresenceEventKind::Seen
        }
    }
}

#[derive(Args)]
pub struct RecordArgs {
    #[arg(help = "Site ID")]
    pub site: SiteId,

    #[arg(help = "Person ID")]
    pub person: PersonId,

    #[arg(long, value_enum, help = "Event kind")]
    pub kind: EventKind,

    #[arg(long, help = "Event time (RFC 3339), defaults to now")]
    pub at: Option<DateTime<Utc>>,

    #[arg(long, help = "Output as JSON")]
    pub json: bool
}

pub async fn run(args: RecordArgs, config: &Config) -> Result<()> {
    let store = settings::connect(config).await?;
    let registrar = PresenceRegistrar::from_store(store, &config.access);
    let kind = PresenceEventKind::from(args.kind);
    let at = args.at.unwrap_or_else(Utc::now);

    let registered = registrar.register(args.site, args.person, kind, at).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&registered)?);
        return Ok(());
    }
    output::success(&format!(
        "Recorded {} of {} at {}",
        kind, args.person, args.site
    ));
    output::decision(&registered.decision);
    output::info(&format!("Last seen: {}", registered.last_seen));
    Ok(())
}
