/// Message-to-invocation dispatch.
///
/// Unprefixed and unknown messages are ordinary chat traffic and are dropped
/// without a reply. Only failures of a command that was found and permitted
/// are reported, and those go to the `ErrorSink` rather than the caller.
use anyhow::Result;
use async_trait::async_trait;
use sigil_core::{ErrorSink, InboundMessage, Transport};
use tracing::{debug, info, warn};

use crate::detection::parse_invocation;
use crate::registry::CommandRegistry;

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// The body of a command.
///
/// `msg.content` holds only the argument text. Handlers run with no deadline.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Written by the bot itself.
    IgnoredSelf,
    /// Did not start with the sigil.
    IgnoredNoSigil,
    /// No command registered under the parsed name.
    IgnoredUnknown(String),
    /// Owner-only command invoked by someone else.
    Denied(String),
    Executed(String),
    /// The handler returned an error; it was forwarded to the sink.
    Failed(String),
}

pub struct CommandDispatcher {
    registry: CommandRegistry,
    sigil: String,
    owner: String,
    errors: ErrorSink,
}

impl CommandDispatcher {
    pub fn new(
        registry: CommandRegistry,
        sigil: impl Into<String>,
        owner: impl Into<String>,
        errors: ErrorSink,
    ) -> Self {
        Self { registry, sigil: sigil.into(), owner: owner.into(), errors }
    }

    pub fn sigil(&self) -> &str {
        &self.sigil
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub async fn dispatch(&self, session: &dyn Transport, msg: &InboundMessage) -> DispatchOutcome {
        if msg.author.id == session.current_user_id() {
            return DispatchOutcome::IgnoredSelf;
        }

        let Some(inv) = parse_invocation(&msg.content, &self.sigil) else {
            return DispatchOutcome::IgnoredNoSigil;
        };

        let Some(cmd) = self.registry.get(&inv.name).await else {
            debug!(command = %inv.name, "Unknown command ignored");
            return DispatchOutcome::IgnoredUnknown(inv.name);
        };

        if !cmd.permits(&msg.author.id, &self.owner) {
            debug!(command = %inv.name, author = %msg.author.id, "Owner-only command denied");
            return DispatchOutcome::Denied(inv.name);
        }

        info!(command = %inv.name, channel = %msg.channel_id, author = %msg.author.id, "Dispatching");
        let invoked = msg.with_content(inv.args);
        match cmd.execute(session, &invoked).await {
            Ok(()) => DispatchOutcome::Executed(inv.name),
            Err(e) => {
                warn!(command = %inv.name, error = %e, "Command failed");
                self.errors.send(e.context(format!("command {:?} failed", inv.name)));
                DispatchOutcome::Failed(inv.name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Command;
    use anyhow::bail;
    use sigil_core::testing::RecordingTransport;
    use sigil_core::Author;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    const BOT: &str = "bot";
    const OWNER: &str = "owner";

    /// Records the argument text of every invocation.
    #[derive(Default)]
    struct Probe {
        calls: AtomicUsize,
        last_args: Mutex<Option<String>>,
    }

    #[async_trait]
    impl CommandHandler for Probe {
        async fn execute(&self, _session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_args.lock().unwrap() = Some(msg.content.clone());
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl CommandHandler for Broken {
        async fn execute(&self, _session: &dyn Transport, _msg: &InboundMessage) -> Result<()> {
            bail!("dice out of bounds")
        }
    }

    fn message(author: &str, content: &str) -> InboundMessage {
        InboundMessage::new("m1", "c1", Author::new(author, author), content)
    }

    async fn setup(errors: ErrorSink) -> (CommandDispatcher, Arc<Probe>, Arc<Probe>) {
        let registry = CommandRegistry::new();
        let roll = Arc::new(Probe::default());
        let say = Arc::new(Probe::default());
        registry.put(Command::new("roll", roll.clone())).await;
        registry.put(Command::new("say", say.clone()).owner_only()).await;
        registry.put(Command::new("broken", Arc::new(Broken))).await;
        (CommandDispatcher::new(registry, "!", OWNER, errors), roll, say)
    }

    #[tokio::test]
    async fn passes_argument_text() {
        let (dispatcher, roll, _) = setup(ErrorSink::new()).await;
        let session = RecordingTransport::new(BOT);

        let outcome = dispatcher.dispatch(&session, &message("alice", "!roll 2d6 extra text")).await;
        assert_eq!(outcome, DispatchOutcome::Executed("roll".into()));
        assert_eq!(roll.last_args.lock().unwrap().as_deref(), Some("2d6 extra text"));
    }

    #[tokio::test]
    async fn ignores_own_messages() {
        let (dispatcher, roll, say) = setup(ErrorSink::new()).await;
        let session = RecordingTransport::new(BOT);

        for content in ["!roll d6", "!say hi", "!help", "plain"] {
            let outcome = dispatcher.dispatch(&session, &message(BOT, content)).await;
            assert_eq!(outcome, DispatchOutcome::IgnoredSelf);
        }
        assert_eq!(roll.calls.load(Ordering::SeqCst), 0);
        assert_eq!(say.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ignores_unprefixed_and_unknown() {
        let (dispatcher, roll, _) = setup(ErrorSink::new()).await;
        let session = RecordingTransport::new(BOT);

        assert_eq!(
            dispatcher.dispatch(&session, &message("alice", "roll d6")).await,
            DispatchOutcome::IgnoredNoSigil
        );
        assert_eq!(
            dispatcher.dispatch(&session, &message("alice", "!rol d6")).await,
            DispatchOutcome::IgnoredUnknown("rol".into())
        );
        assert_eq!(roll.calls.load(Ordering::SeqCst), 0);
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn owner_gate_is_silent() {
        let (dispatcher, _, say) = setup(ErrorSink::new()).await;
        let session = RecordingTransport::new(BOT);

        for content in ["!say hi", "!say", "!say  lots of words "] {
            let outcome = dispatcher.dispatch(&session, &message("mallory", content)).await;
            assert_eq!(outcome, DispatchOutcome::Denied("say".into()));
        }
        assert_eq!(say.calls.load(Ordering::SeqCst), 0);
        assert!(session.is_empty());

        let outcome = dispatcher.dispatch(&session, &message(OWNER, "!say hi")).await;
        assert_eq!(outcome, DispatchOutcome::Executed("say".into()));
        assert_eq!(say.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_errors_go_to_sink() {
        let errors = ErrorSink::new();
        let (tx, mut rx) = mpsc::channel(4);
        errors.register(tx);
        let (dispatcher, roll, _) = setup(errors).await;
        let session = RecordingTransport::new(BOT);

        let outcome = dispatcher.dispatch(&session, &message("alice", "!broken")).await;
        assert_eq!(outcome, DispatchOutcome::Failed("broken".into()));
        let err = rx.recv().await.unwrap();
        assert!(format!("{err:#}").contains("dice out of bounds"));

        // Later messages are unaffected.
        let outcome = dispatcher.dispatch(&session, &message("alice", "!roll d6")).await;
        assert_eq!(outcome, DispatchOutcome::Executed("roll".into()));
        assert_eq!(roll.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_errors_without_consumer_are_dropped() {
        let (dispatcher, _, _) = setup(ErrorSink::new()).await;
        let session = RecordingTransport::new(BOT);
        let outcome = dispatcher.dispatch(&session, &message("alice", "!broken")).await;
        assert_eq!(outcome, DispatchOutcome::Failed("broken".into()));
    }
}
