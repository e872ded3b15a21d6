//! The read-only key/value store plugins configure themselves from.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Top-level keys of a loaded config file, each holding arbitrary JSON.
///
/// Loaded once at startup and never mutated, so it is shared behind an
/// `Arc` without a lock.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: Map<String, Value>,
}

impl Config {
    /// An empty store. Every `get` reports `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed document. The top level must be an object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Decode the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let raw = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        T::deserialize(raw).map_err(|source| ConfigError::Decode { key: key.to_string(), source })
    }

    /// Like `get`, but an absent key yields `T::default()`. A present key
    /// that fails to decode is still an error.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, ConfigError> {
        match self.get(key) {
            Err(ConfigError::NotFound(_)) => Ok(T::default()),
            other => other,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The whole document, for redacted display.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}
