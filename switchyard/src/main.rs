#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod plan;

use args::{Args, Command};
use clap::Parser;
use switchyard_config::Config;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    switchyard_telemetry::init(args.log_format, &args.log)?;

    let config = Config::load(&args.config)?;
    tracing::debug!(config_path = %args.config.display(), "configuration loaded");

    // Abandon in-flight token exchanges on Ctrl+C
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            on_interrupt.cancel();
        }
    });

    match args.command {
        Command::Plan(plan_args) => {
            let planned = plan::run(&config, &plan_args, &cancel).await?;
            println!("{}", serde_json::to_string_pretty(&planned)?);
        }
    }

    Ok(())
}
