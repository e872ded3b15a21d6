//! Loading config files from disk.

use std::path::Path;

use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::env::resolve_env_vars;
use crate::error::ConfigError;
use crate::store::Config;

/// Document syntax, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// `.json` is JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Parse a document and apply `${VAR}` substitution from the process environment.
pub fn parse_config(raw: &str, format: Format) -> Result<Config, ConfigError> {
    let value: Value = match format {
        Format::Json => serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?,
        Format::Yaml => serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?,
    };
    Config::from_value(resolve_env_vars(&value)?)
}

/// Read and parse the config file at `path`.
pub async fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let config = parse_config(&raw, Format::from_path(path))?;
    info!(path = %path.display(), keys = config.keys().count(), "Loaded config");
    Ok(config)
}
