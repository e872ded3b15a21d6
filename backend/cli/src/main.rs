mod check;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info};

use sigil_builtins::builtin_plugins;
use sigil_channels::{ChannelAdapter, DiscordAdapter};
use sigil_config::BotSettings;
use sigil_runtime::Bot;

#[derive(Parser)]
#[command(name = "sigil")]
#[command(about = "A plugin-driven Discord bot")]
#[command(version)]
struct Cli {
    /// Config file (JSON, or YAML for any other extension)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve commands (the default)
    Run {
        /// Log level used when RUST_LOG is unset
        #[arg(long, default_value = "info")]
        log_level: String,
    },
    /// Load the config and every plugin, then print what would be served
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run { log_level: "info".into() }) {
        Commands::Run { log_level } => run(&cli.config, &log_level).await,
        Commands::Check => check::run(&cli.config).await,
    }
}

async fn run(config_path: &Path, log_level: &str) -> Result<()> {
    let config = sigil_config::load_config(config_path)
        .await
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    let settings = BotSettings::from_config(&config)?;
    sigil_logging::init_logger(settings.logpath.as_deref(), log_level);

    let bot = Bot::new(config).await?;

    // Capacity 1: errors raised while the consumer is busy are dropped.
    let (tx, mut rx) = mpsc::channel::<anyhow::Error>(1);
    bot.notify_on_error(tx);
    tokio::spawn(async move {
        while let Some(err) = rx.recv().await {
            sigil_logging::log_error(&err);
        }
    });

    bot.load_plugins(builtin_plugins()).await?;
    info!(commands = bot.commands().len().await, "Plugins loaded");

    let bot = Arc::new(bot);
    let adapter = Arc::new(DiscordAdapter::new(settings.token, bot));

    let runner = adapter.clone();
    let mut client = tokio::spawn(async move { runner.start().await });

    tokio::select! {
        res = &mut client => match res {
            Ok(Ok(())) => info!("Discord client stopped"),
            Ok(Err(e)) => {
                error!(error = %e, "Discord adapter failed");
                return Err(e);
            }
            Err(e) => return Err(e).context("Discord adapter task panicked"),
        },
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            adapter.shutdown().await;
            let _ = client.await;
        }
    }

    info!("Bye");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            error!(error = %e, "Failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
