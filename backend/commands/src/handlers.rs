/// Built-in command handlers.
///
/// Only `help` lives here; everything else is contributed by plugins.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sigil_core::{Embed, InboundMessage, Transport};

use crate::dispatch::CommandHandler;
use crate::registry::{CommandRegistry, WeakCommandRegistry};
use crate::types::Command;

/// Placeholder for help text a command left empty.
const MISSING_TEXT: &str = "<undefined>";

// ---------------------------------------------------------------------------
// /help
// ---------------------------------------------------------------------------

/// Lists commands, or shows usage for one. Holds a weak handle because it
/// is itself stored in the registry it reads.
pub struct HelpHandler {
    registry: WeakCommandRegistry,
    sigil: String,
    owner: String,
}

impl HelpHandler {
    pub fn new(registry: &CommandRegistry, sigil: impl Into<String>, owner: impl Into<String>) -> Self {
        Self { registry: registry.downgrade(), sigil: sigil.into(), owner: owner.into() }
    }

    /// The `help` command itself, wired to this handler.
    pub fn command(self) -> Command {
        Command::new("help", Arc::new(self))
            .comment("get info about commands")
            .usage(["help [<command>]"])
            .description("Get information about commands. If a command is not specified, list all commands.")
    }

    async fn help(
        &self,
        registry: &CommandRegistry,
        session: &dyn Transport,
        msg: &InboundMessage,
    ) -> Result<()> {
        let Some(cmd) = registry.get(&msg.content).await else {
            return session.send_message(&msg.channel_id, "Command not found.").await;
        };

        // The one place a denial is reported to the user.
        if !cmd.permits(&msg.author.id, &self.owner) {
            return session
                .send_message(&msg.channel_id, "You do not have permission to use that command.")
                .await;
        }

        let usage = cmd
            .usage
            .iter()
            .map(|u| format!("`{}{}`", self.sigil, u))
            .collect::<Vec<_>>()
            .join("\n");
        let usage = if usage.is_empty() { MISSING_TEXT.to_string() } else { usage };

        let mut description = if cmd.description.is_empty() {
            MISSING_TEXT.to_string()
        } else {
            cmd.description.clone()
        };
        if cmd.owner_only {
            description.push_str("\n\nOwner only.");
        }

        let embed = Embed::new()
            .field("Usage:", usage, false)
            .field("Description:", description, false)
            .footer(format!("For a list of all commands, use {}help", self.sigil));
        session.send_embed(&msg.channel_id, &embed).await
    }

    async fn help_list(
        &self,
        registry: &CommandRegistry,
        session: &dyn Transport,
        msg: &InboundMessage,
    ) -> Result<()> {
        let is_owner = msg.author.id == self.owner;
        let mut embed = Embed::new().title("Commands:");

        for (name, cmd) in registry.list().await {
            if name.is_empty() || cmd.hidden || (cmd.owner_only && !is_owner) {
                continue;
            }
            let mut value = if cmd.comment.is_empty() {
                MISSING_TEXT.to_string()
            } else {
                cmd.comment.clone()
            };
            if cmd.owner_only {
                value.push_str("\nowner only");
            }
            embed = embed.field(name, value, false);
        }

        let embed = embed.footer(format!("For more information, use {}help <command>", self.sigil));
        session.send_embed(&msg.channel_id, &embed).await
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
        let Some(registry) = self.registry.upgrade() else {
            return Ok(());
        };
        if msg.content.is_empty() {
            self.help_list(&registry, session, msg).await
        } else {
            self.help(&registry, session, msg).await
        }
    }
}
