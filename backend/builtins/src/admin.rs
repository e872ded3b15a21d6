//! Owner-only commands that act as the bot: `say`, `name` and `status`.
//!
//! Each deletes the invoking message first so only the effect is visible.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sigil_commands::{Command, CommandHandler};
use sigil_core::{InboundMessage, Transport};
use sigil_plugins::SimplePlugin;

/// `None` for empty argument text, meaning "reset".
fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

pub struct Say;

#[async_trait]
impl CommandHandler for Say {
    async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
        session.delete_message(&msg.channel_id, &msg.id).await?;
        if let Some(text) = non_empty(&msg.content) {
            session.send_message(&msg.channel_id, text).await?;
        }
        Ok(())
    }
}

pub struct Nickname;

#[async_trait]
impl CommandHandler for Nickname {
    async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
        session.delete_message(&msg.channel_id, &msg.id).await?;
        session.set_nickname(&msg.channel_id, non_empty(&msg.content)).await
    }
}

pub struct Status;

#[async_trait]
impl CommandHandler for Status {
    async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
        session.delete_message(&msg.channel_id, &msg.id).await?;
        session.set_status(non_empty(&msg.content)).await
    }
}

pub fn say_plugin() -> SimplePlugin {
    SimplePlugin::new("say").command(
        Command::new("say", Arc::new(Say))
            .comment("say a message")
            .usage(["say <message>"])
            .description("Make the bot say the message.")
            .owner_only(),
    )
}

pub fn name_plugin() -> SimplePlugin {
    SimplePlugin::new("name").command(
        Command::new("name", Arc::new(Nickname))
            .comment("change bot nickname")
            .usage(["name [<nickname>]"])
            .description("Change or reset the bot's nickname in the guild.")
            .owner_only(),
    )
}

pub fn status_plugin() -> SimplePlugin {
    SimplePlugin::new("status").command(
        Command::new("status", Arc::new(Status))
            .comment("change bot status")
            .usage(["status [<game>]"])
            .description("Change the bot's status.")
            .owner_only(),
    )
}
