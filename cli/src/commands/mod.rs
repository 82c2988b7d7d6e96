pub mod evaluate;
pub mod migrate;
pub mod record;
pub mod status;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "siteaccess",
    author,
    version,
    about = "Site access - check and register presence at managed sites",
    long_about = "Decides whether a person may enter or leave a shelter or facility, shows \
                  flag instructions for reception staff, and records check-in, check-out and \
                  \"seen\" events.\n\nConfiguration is read from an optional file, then SA_*, \
                  PG_* and OB_* environment variables, then command line flags."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    #[arg(
        long,
        global = true,
        env = "SITEACCESS_CONFIG",
        help = "Configuration file (.toml, .yaml, .yml)"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "PostgreSQL host")]
    pub pg_host: Option<String>,

    #[arg(long, global = true, help = "PostgreSQL port")]
    pub pg_port: Option<u16>,

    #[arg(long, global = true, help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Evaluate whether a person may be registered at a site")]
    Evaluate(evaluate::EvaluateArgs),

    #[command(about = "Record a check-in, check-out or seen event")]
    Record(record::RecordArgs),

    #[command(about = "Show a person's current presence at a site")]
    Status(status::StatusArgs),

    #[command(about = "Create the database schema")]
    Migrate(migrate::MigrateArgs)
}
