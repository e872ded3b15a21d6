/// Name-keyed table of every loaded command.
///
/// Readers (dispatch lookups, help listings) share the lock; a write holds
/// it only for the single map mutation. Returned entries are `Arc`s so no
/// lock is held while a handler runs.
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tokio::sync::RwLock;
use tracing::debug;

use crate::types::Command;

type CommandMap = HashMap<String, Arc<Command>>;

#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: Arc<RwLock<CommandMap>>,
}

/// Non-owning handle, for commands that need to read the table they live in.
#[derive(Clone)]
pub struct WeakCommandRegistry {
    commands: Weak<RwLock<CommandMap>>,
}

impl WeakCommandRegistry {
    pub fn upgrade(&self) -> Option<CommandRegistry> {
        self.commands.upgrade().map(|commands| CommandRegistry { commands })
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command, replacing any entry with the same name.
    pub async fn put(&self, command: Command) {
        let name = command.name.clone();
        let replaced = self
            .commands
            .write()
            .await
            .insert(name.clone(), Arc::new(command))
            .is_some();
        debug!(command = %name, replaced, "Command registered");
    }

    /// Find a command by exact name.
    pub async fn get(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.read().await.get(name).cloned()
    }

    /// Snapshot of every entry, sorted by name.
    pub async fn list(&self) -> Vec<(String, Arc<Command>)> {
        let mut entries: Vec<_> = self
            .commands
            .read()
            .await
            .iter()
            .map(|(name, cmd)| (name.clone(), cmd.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn downgrade(&self) -> WeakCommandRegistry {
        WeakCommandRegistry { commands: Arc::downgrade(&self.commands) }
    }

    pub async fn len(&self) -> usize {
        self.commands.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.commands.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::CommandHandler;
    use anyhow::Result;
    use async_trait::async_trait;
    use sigil_core::{InboundMessage, Transport};

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn execute(&self, _session: &dyn Transport, _msg: &InboundMessage) -> Result<()> {
            Ok(())
        }
    }

    fn cmd(name: &str) -> Command {
        Command::new(name, Arc::new(Noop))
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let registry = CommandRegistry::new();
        assert!(registry.get("roll").await.is_none());
    }

    #[tokio::test]
    async fn put_replaces_existing() {
        let registry = CommandRegistry::new();
        registry.put(cmd("roll").comment("old").usage(["roll d6"])).await;
        registry.put(cmd("roll").comment("new")).await;

        let found = registry.get("roll").await.unwrap();
        assert_eq!(found.comment, "new");
        assert!(found.usage.is_empty());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let registry = CommandRegistry::new();
        registry.put(cmd("roll")).await;
        assert!(registry.get("Roll").await.is_none());
    }

    #[tokio::test]
    async fn list_is_sorted_regardless_of_insertion_order() {
        let registry = CommandRegistry::new();
        for name in ["xkcd", "8ball", "roll", "help", "avatar"] {
            registry.put(cmd(name)).await;
        }
        let names: Vec<String> = registry.list().await.into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["8ball", "avatar", "help", "roll", "xkcd"]);
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn list_is_a_snapshot() {
        let registry = CommandRegistry::new();
        registry.put(cmd("roll")).await;
        let snapshot = registry.list().await;
        registry.put(cmd("say")).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.list().await.len(), 2);
    }

    #[tokio::test]
    async fn weak_handle_does_not_keep_table_alive() {
        let registry = CommandRegistry::new();
        let weak = registry.downgrade();
        weak.upgrade().unwrap().put(cmd("roll")).await;
        assert!(registry.get("roll").await.is_some());
        drop(registry);
        assert!(weak.upgrade().is_none());
    }

    #[tokio::test]
    async fn clones_share_the_table() {
        let registry = CommandRegistry::new();
        let clone = registry.clone();
        clone.put(cmd("roll")).await;
        assert!(registry.get("roll").await.is_some());
    }
}
