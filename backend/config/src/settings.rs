//! Settings the runtime itself reads from the config store.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::store::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    /// Platform credential.
    pub token: String,
    /// Identity allowed to run owner-only commands.
    pub owner: String,
    /// Literal prefix marking a command invocation.
    pub sigil: String,
    /// Directory for the rolling JSON log, if any.
    pub logpath: Option<PathBuf>,
}

impl BotSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let token: String = config.get("token")?;
        let owner: String = config.get("owner")?;
        let sigil: String = config.get("sigil")?;
        if sigil.is_empty() {
            return Err(ConfigError::invalid("sigil", "must not be empty"));
        }
        let logpath = config
            .get_or_default::<Option<String>>("logpath")?
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Ok(Self { token, owner, sigil, logpath })
    }
}
