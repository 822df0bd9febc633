use anyhow::Context;
use clap::Parser;
use job_sync::cli::{Cli, Command};
use job_sync::{AppState, PassOptions, Server, SyncOrchestrator};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.sync.into_config();
    info!("Syncing {} into collection {}", config.board_url, config.cms.collection_id);

    let orchestrator = SyncOrchestrator::from_config(config).context("invalid sync configuration")?;

    match cli.command {
        Command::Serve { listen } => {
            let state = AppState {
                orchestrator: Arc::new(orchestrator),
            };
            Server::new(listen, state)
                .run(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await
                .context("sync server failed")?;
        }
        Command::Once { dry_run, confirm_teardown } => {
            let options = PassOptions { dry_run, confirm_teardown };
            let report = orchestrator.run_pass(options).await.context("sync pass failed")?;
            println!("{}", serde_json::to_string_pretty(&report.body())?);
            if !report.is_complete() {
                for message in report.errors() {
                    error!("{}", message);
                }
                anyhow::bail!("sync pass finished with {} errors", report.errors().len());
            }
        }
    }

    Ok(())
}
