use clap::Parser;

use weather_push_core::{Config, RunOutcome, pipeline};

/// Top-level CLI struct. The job takes no positional arguments; everything
/// comes from environment variables.
#[derive(Debug, Parser)]
#[command(name = "weather-push", version, about = "Scheduled weather report pusher")]
pub struct Cli {
    /// Render the text report to stdout without delivering anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::from_env()?;
        tracing::info!(
            recipients = config.wxpusher_uids.len(),
            trigger = ?config.trigger,
            "starting weather push run"
        );

        match pipeline::run(&config, self.dry_run).await? {
            RunOutcome::DryRun(text) => println!("{text}"),
            RunOutcome::FetchFailed => tracing::warn!("run finished without a report"),
            RunOutcome::Delivered => tracing::info!("run finished"),
        }

        Ok(())
    }
}
