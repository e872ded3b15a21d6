//! `sigil-config`: configuration for the sigil runtime.
//!
//! Provides:
//! - A read-only key/value `Config` loaded from JSON or YAML
//! - `${ENV_VAR}` substitution in string values
//! - `BotSettings`, the keys the runtime itself needs
//! - Redaction for safe display

pub mod env;
pub mod error;
pub mod io;
pub mod redact;
pub mod settings;
pub mod store;

pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use error::ConfigError;
pub use io::{load_config, parse_config, Format};
pub use redact::redact;
pub use settings::BotSettings;
pub use store::Config;
