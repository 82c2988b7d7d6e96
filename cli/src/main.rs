use access::RegistrationRejected;
use anyhow::Result;
use clap::Parser;
use metrics_util::debugging::{DebuggingRecorder, Snapshotter};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;
mod settings;

use commands::{Cli, Commands};

/// Exit status for a registration the engine refused.
const REJECTED_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = settings::load(&cli.global)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.logging_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let snapshotter = if config.observability.metrics_enabled {
        install_recorder()
    } else {
        None
    };

    let result = match cli.command {
        Commands::Evaluate(args) => commands::evaluate::run(args, &config).await,
        Commands::Record(args) => commands::record::run(args, &config).await,
        Commands::Status(args) => commands::status::run(args, &config).await,
        Commands::Migrate(args) => commands::migrate::run(args, &config).await
    };

    if let Some(snapshotter) = snapshotter {
        for (key, _, _, value) in snapshotter.snapshot().into_vec() {
            tracing::debug!(metric = %key.key().name(), value = ?value, "metric");
        }
    }

    if let Err(err) = &result
        && let Some(code) = exit_code(err)
    {
        output::error(&err.to_string());
        std::process::exit(code);
    }

    result
}

/// Refusals get their own exit status; every other failure falls through to
/// anyhow's default.
fn exit_code(err: &anyhow::Error) -> Option<i32> {
    err.chain()
        .any(|cause| cause.is::<RegistrationRejected>())
        .then_some(REJECTED_EXIT_CODE)
}

fn install_recorder() -> Option<Snapshotter> {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    match metrics::set_global_recorder(recorder) {
        Ok(()) => Some(snapshotter),
        Err(e) => {
            tracing::warn!("Metrics recorder not installed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use access::AccessError;
    use errors::StorageError;
    use site_core::{DenialReason, PresenceEventKind};

    #[test]
    fn test_rejections_map_to_their_own_exit_code() {
        let denied = anyhow::Error::from(RegistrationRejected::DirectionDenied {
            kind: PresenceEventKind::CheckOut
        });
        assert_eq!(exit_code(&denied), Some(REJECTED_EXIT_CODE));

        let wrapped = anyhow::Error::from(AccessError::from(RegistrationRejected::NotPermitted {
            reason: DenialReason::ClosedCase
        }));
        assert_eq!(exit_code(&wrapped), Some(REJECTED_EXIT_CODE));
    }

    #[test]
    fn test_other_failures_keep_default_exit() {
        let storage = anyhow::Error::from(AccessError::from(StorageError::query("cases", "down")));
        assert_eq!(exit_code(&storage), None);
        assert_eq!(exit_code(&anyhow::anyhow!("config missing")), None);
    }
}
