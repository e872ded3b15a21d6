/// Plugin registry: loads plugins and keeps the named ones for lookup.
use std::collections::HashMap;
use std::sync::Arc;

use sigil_core::BotError;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::sdk::{Plugin, PluginHost};

#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: Arc<RwLock<HashMap<String, Arc<dyn Plugin>>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `plugin.load` against `host` and, if it succeeds and the plugin is
    /// named, store it. The table stays write-locked for the whole load, so
    /// loads never interleave.
    pub async fn add(&self, plugin: Arc<dyn Plugin>, host: &dyn PluginHost) -> Result<(), BotError> {
        let mut plugins = self.plugins.write().await;
        let name = plugin.name().to_string();

        if let Err(e) = plugin.load(host).await {
            warn!(plugin = %name, error = %e, "Plugin failed to load");
            return Err(BotError::plugin_load(name, e));
        }

        if name.is_empty() {
            info!("Anonymous plugin loaded");
        } else {
            info!(plugin = %name, "Plugin loaded");
            plugins.insert(name, plugin);
        }
        Ok(())
    }

    pub async fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.read().await.get(name).cloned()
    }

    /// Names of every stored plugin, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.plugins.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.plugins.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.plugins.read().await.is_empty()
    }
}
