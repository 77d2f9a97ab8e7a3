mod cli;
mod commands;
mod config;
mod terminal;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use harbor_registry::{FileStore, HostRegistry, ReqwestProbe, Validator};

use crate::cli::Commands;
use crate::commands::{handle_config_command, handle_host_command};
use crate::config::Config;
use crate::terminal::LoggingSync;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let command = match cli.command {
        Commands::Config { command } => return handle_config_command(command).await,
        other => other,
    };

    let config = Config::load().await?;
    let settings = config.registry_settings();

    let store = FileStore::open(config.storage_path())?;
    let mut registry =
        HostRegistry::new(Box::new(store), settings.clone()).with_sync(Arc::new(LoggingSync));
    let source = registry.load()?;
    tracing::debug!("Registry loaded from {:?}", source);

    let validator = Validator::new(Arc::new(ReqwestProbe::new()))
        .with_timeout(Duration::from_millis(settings.validation_timeout_ms));

    handle_host_command(command, &mut registry, &validator, &config).await
}
