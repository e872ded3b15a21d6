use thiserror::Error;

/// Top-level error type for the sigil runtime.
#[derive(Debug, Error)]
pub enum BotError {
    /// A plugin's load step failed. Fatal to startup.
    #[error("load plugin {name:?} failed: {source}")]
    PluginLoad {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// The runtime's own settings could not be read.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BotError {
    pub fn plugin_load(name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::PluginLoad { name: name.into(), source }
    }

    /// Name of the plugin that failed to load, if this is a load error.
    pub fn plugin_name(&self) -> Option<&str> {
        match self {
            Self::PluginLoad { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_load_message_names_plugin() {
        let err = BotError::plugin_load("roll", anyhow::anyhow!("bad limits"));
        assert_eq!(err.to_string(), "load plugin \"roll\" failed: bad limits");
        assert_eq!(err.plugin_name(), Some("roll"));
    }

    #[test]
    fn config_errors_have_no_plugin_name() {
        let err = BotError::Config("missing key".into());
        assert_eq!(err.to_string(), "configuration error: missing key");
        assert!(err.plugin_name().is_none());
    }

    #[test]
    fn every_variant_is_a_startup_failure() {
        let errors = [BotError::plugin_load("xkcd", anyhow::anyhow!("no client")), BotError::Config("x".into())];
        for err in errors {
            // No wildcard: a new variant must be placed in the startup taxonomy here.
            let startup = match err {
                BotError::PluginLoad { .. } => true,
                BotError::Config(_) => true,
            };
            assert!(startup);
        }
    }
}
