//! Plugin SDK
//!
//! The interfaces a plugin is written against. A plugin never sees the
//! runtime itself, only the narrow `PluginHost` capability handed to `load`.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sigil_commands::Command;
use sigil_config::Config;

use crate::event_bus::EventListener;

/// What a plugin may do while loading.
///
/// Has no way back into the plugin table: `load` runs with that table
/// locked.
#[async_trait]
pub trait PluginHost: Send + Sync {
    /// Register a command, replacing any with the same name.
    async fn add_command(&self, command: Command);

    async fn get_command(&self, name: &str) -> Option<Arc<Command>>;

    /// Receive every raw platform event from now on.
    async fn subscribe(&self, listener: Arc<dyn EventListener>);

    fn config(&self) -> &Config;

    fn sigil(&self) -> &str;

    fn owner(&self) -> &str;

    /// Report an error without blocking. Returns whether it was delivered.
    fn send_error(&self, err: anyhow::Error) -> bool;
}

/// A unit of bot functionality, loaded once at startup.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Lookup key. Empty means the plugin is loaded but not retrievable.
    fn name(&self) -> &str;

    async fn load(&self, host: &dyn PluginHost) -> Result<()>;
}

/// A plugin that only registers a fixed set of commands and listeners.
#[derive(Clone, Default)]
pub struct SimplePlugin {
    name: String,
    commands: Vec<Command>,
    listeners: Vec<Arc<dyn EventListener>>,
}

impl SimplePlugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn listener(mut self, listener: Arc<dyn EventListener>) -> Self {
        self.listeners.push(listener);
        self
    }
}

#[async_trait]
impl Plugin for SimplePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, host: &dyn PluginHost) -> Result<()> {
        for command in &self.commands {
            host.add_command(command.clone()).await;
        }
        for listener in &self.listeners {
            host.subscribe(listener.clone()).await;
        }
        Ok(())
    }
}
