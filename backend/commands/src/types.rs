/// Command types.
///
/// A `Command` pairs help metadata and capability flags with the handler that
/// runs it. Flags are plain fields checked by the dispatcher and the help
/// listing; there is no wrapper type per capability.
use std::sync::Arc;

use anyhow::Result;
use sigil_core::{InboundMessage, Transport};

use crate::dispatch::CommandHandler;

// ---------------------------------------------------------------------------
// Command definition
// ---------------------------------------------------------------------------

/// A named, invocable unit registered by a plugin.
#[derive(Clone)]
pub struct Command {
    /// Registry key. Matched exactly and case-sensitively.
    pub name: String,
    /// One-line summary shown in the command list.
    pub comment: String,
    /// Syntax lines, without the sigil.
    pub usage: Vec<String>,
    /// Long-form help text.
    pub description: String,
    /// Left out of the command list but still invocable.
    pub hidden: bool,
    /// Only the configured owner may invoke it.
    pub owner_only: bool,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            usage: Vec::new(),
            description: String::new(),
            hidden: false,
            owner_only: false,
            handler,
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn usage<I, S>(mut self, usage: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usage = usage.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    /// The same handler and help text under another name.
    /// Flags are copied; chain `.hidden()` to keep the alias out of listings.
    pub fn alias(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(), ..self.clone() }
    }

    /// Whether `author_id` may invoke this command.
    pub fn permits(&self, author_id: &str, owner_id: &str) -> bool {
        !self.owner_only || author_id == owner_id
    }

    pub async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
        self.handler.execute(session, msg).await
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("comment", &self.comment)
            .field("usage", &self.usage)
            .field("hidden", &self.hidden)
            .field("owner_only", &self.owner_only)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Parsed invocation
// ---------------------------------------------------------------------------

/// A message split into command name and argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    /// Everything after the name, trimmed.
    pub args: String,
}
