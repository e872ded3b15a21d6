use std::path::PathBuf;

use crate::env::MissingEnvVarError;

/// Everything that can go wrong reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("config must be a key/value object at the top level")]
    NotAnObject,

    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),

    #[error("key {0:?} not found in config")]
    NotFound(String),

    #[error("failed to unmarshal key {key:?}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for key {key:?}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid { key: key.into(), reason: reason.into() }
    }

    /// True when the error only says the key is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
