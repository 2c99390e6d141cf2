use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use shellclaw::bot;
use shellclaw::channels::TelegramChannel;
use shellclaw::config::Config;
use shellclaw::telemetry::SystemProbe;

/// `ShellClaw` - remote server administration over Telegram.
#[derive(Parser, Debug)]
#[command(name = "shellclaw")]
#[command(version)]
#[command(about = "Remote server administration over Telegram.", long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().context("Cannot start without a valid configuration")?;

    let channel = TelegramChannel::new(config.token.clone());
    let bot_name = channel
        .get_me()
        .await
        .context("Telegram gateway rejected the bot credentials")?;
    tracing::info!(bot = %bot_name, "ShellClaw online, long-polling for commands");

    bot::run(config, Arc::new(channel), Box::new(SystemProbe::new())).await
}
