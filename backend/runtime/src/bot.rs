//! The runtime object.
//!
//! `Bot` owns one of each table (commands, plugins, event listeners) and the
//! error sink. Transports hand it raw events; plugins see it only through
//! `PluginHost`.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use sigil_commands::{Command, CommandDispatcher, CommandRegistry, DispatchOutcome, HelpHandler};
use sigil_config::{BotSettings, Config};
use sigil_core::{BotError, ErrorSink, RawEvent, Transport};
use sigil_plugins::{EventBus, EventListener, Plugin, PluginHost, PluginRegistry};
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct Bot {
    settings: BotSettings,
    config: Config,
    commands: CommandRegistry,
    plugins: PluginRegistry,
    events: EventBus,
    errors: ErrorSink,
    dispatcher: CommandDispatcher,
}

impl Bot {
    /// Read the runtime's own settings from `config` and register `help`.
    pub async fn new(config: Config) -> Result<Self, BotError> {
        let settings = BotSettings::from_config(&config).map_err(|e| BotError::Config(e.to_string()))?;

        let commands = CommandRegistry::new();
        let errors = ErrorSink::new();
        let dispatcher =
            CommandDispatcher::new(commands.clone(), &settings.sigil, &settings.owner, errors.clone());

        commands
            .put(HelpHandler::new(&commands, &settings.sigil, &settings.owner).command())
            .await;

        info!(sigil = %settings.sigil, owner = %settings.owner, "Bot created");
        Ok(Self {
            settings,
            config,
            commands,
            plugins: PluginRegistry::new(),
            events: EventBus::new(),
            errors,
            dispatcher,
        })
    }

    /// Load one plugin. Fails with `BotError::PluginLoad` if its load step does.
    pub async fn add_plugin(&self, plugin: Arc<dyn Plugin>) -> Result<(), BotError> {
        self.plugins.add(plugin, self).await
    }

    /// Load plugins in order, stopping at the first failure.
    pub async fn load_plugins<I>(&self, plugins: I) -> Result<(), BotError>
    where
        I: IntoIterator<Item = Arc<dyn Plugin>>,
    {
        for plugin in plugins {
            self.add_plugin(plugin).await?;
        }
        info!(plugins = self.plugins.len().await, commands = self.commands.len().await, "Plugins loaded");
        Ok(())
    }

    pub async fn add_command(&self, command: Command) {
        self.commands.put(command).await;
    }

    pub async fn get_command(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.get(name).await
    }

    pub async fn get_plugin(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(name).await
    }

    /// Shared handle to the command table.
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn sigil(&self) -> &str {
        &self.settings.sigil
    }

    /// Make `consumer` the one receiver of reported errors, replacing any
    /// previous one.
    pub fn notify_on_error(&self, consumer: mpsc::Sender<anyhow::Error>) {
        self.errors.register(consumer);
    }

    /// Report an error without blocking. Dropped if no consumer is ready.
    pub fn send_error(&self, err: anyhow::Error) -> bool {
        let delivered = self.errors.send(err);
        if !delivered {
            debug!("Error dropped: no ready consumer");
        }
        delivered
    }

    /// Route one raw platform event. Listeners see every event; a message is
    /// also offered to the dispatcher, concurrently with the listeners.
    /// Nothing here returns an error: failures go to the sink.
    pub async fn handle_event(&self, session: &dyn Transport, event: &RawEvent) -> Option<DispatchOutcome> {
        let listeners = async {
            for err in self.events.publish(session, event).await {
                self.send_error(err);
            }
        };

        match event.as_message() {
            Some(msg) => {
                let ((), outcome) = tokio::join!(listeners, self.dispatcher.dispatch(session, msg));
                Some(outcome)
            }
            None => {
                listeners.await;
                None
            }
        }
    }
}

#[async_trait]
impl PluginHost for Bot {
    async fn add_command(&self, command: Command) {
        Bot::add_command(self, command).await;
    }

    async fn get_command(&self, name: &str) -> Option<Arc<Command>> {
        Bot::get_command(self, name).await
    }

    async fn subscribe(&self, listener: Arc<dyn EventListener>) {
        self.events.subscribe(listener).await;
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn sigil(&self) -> &str {
        Bot::sigil(self)
    }

    fn owner(&self) -> &str {
        &self.settings.owner
    }

    fn send_error(&self, err: anyhow::Error) -> bool {
        Bot::send_error(self, err)
    }
}

/// Build a `Bot` straight from a config file.
pub async fn bot_from_file(path: &std::path::Path) -> anyhow::Result<Bot> {
    let config = sigil_config::load_config(path)
        .await
        .with_context(|| format!("failed to load config {}", path.display()))?;
    Ok(Bot::new(config).await?)
}
