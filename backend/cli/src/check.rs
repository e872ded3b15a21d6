//! `sigil check`: run the startup path without connecting.

use std::path::Path;

use anyhow::{Context, Result};

use sigil_builtins::builtin_plugins;
use sigil_runtime::Bot;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = sigil_config::load_config(config_path)
        .await
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    let redacted = sigil_config::redact(&config.to_value());

    let bot = Bot::new(config).await?;
    bot.load_plugins(builtin_plugins()).await?;

    println!("Config ({}):", config_path.display());
    println!("{}", serde_json::to_string_pretty(&redacted)?);
    println!();
    println!("Commands:");
    for line in command_lines(&bot).await {
        println!("{line}");
    }
    Ok(())
}

/// One line per listable command, owner-only ones marked.
async fn command_lines(bot: &Bot) -> Vec<String> {
    let sigil = bot.sigil();
    bot.commands()
        .list()
        .await
        .into_iter()
        .filter(|(_, cmd)| !cmd.hidden)
        .map(|(name, cmd)| {
            let owner = if cmd.owner_only { " (owner only)" } else { "" };
            format!("  {sigil}{name:<10} {}{owner}", cmd.comment)
        })
        .collect()
}
