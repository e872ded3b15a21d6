//! `${VAR}` substitution for configuration string values.
//!
//! Only uppercase `[A-Z_][A-Z0-9_]*` names are matched, so ordinary text
//! containing `$` or `{` passes through. `$${VAR}` escapes to a literal
//! `${VAR}`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

/// A reference, optionally preceded by the `$` escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// A referenced variable is unset or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute references throughout a value tree from the process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value, MissingEnvVarError> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute references from an explicit variable map.
pub fn resolve_env_vars_with(
    value: &Value,
    env: &HashMap<String, String>,
) -> Result<Value, MissingEnvVarError> {
    substitute_value(value, env, "")
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => substitute_string(s, env, path).map(Value::String),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                out.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing = None;
    let replaced = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    match missing {
        Some(err) => Err(err),
        None => Ok(replaced.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_token() {
        let v = json!({"token": "${DISCORD_TOKEN}"});
        let result = resolve_env_vars_with(&v, &env(&[("DISCORD_TOKEN", "abc.def")])).unwrap();
        assert_eq!(result["token"], "abc.def");
    }

    #[test]
    fn substitutes_inside_text_and_arrays() {
        let v = json!({"8ball": {"Insults": ["ask ${WHO}", "plain"]}});
        let result = resolve_env_vars_with(&v, &env(&[("WHO", "someone else")])).unwrap();
        assert_eq!(result["8ball"]["Insults"][0], "ask someone else");
        assert_eq!(result["8ball"]["Insults"][1], "plain");
    }

    #[test]
    fn missing_var_reports_path() {
        let v = json!({"roll": {"Dice": {"Max": "${NOPE}"}}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err();
        assert_eq!(err.var_name, "NOPE");
        assert_eq!(err.config_path, "roll.Dice.Max");
    }

    #[test]
    fn empty_var_counts_as_missing() {
        let v = json!({"owner": "${OWNER_ID}"});
        assert!(resolve_env_vars_with(&v, &env(&[("OWNER_ID", "")])).is_err());
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"sigil": "$${NOT_A_VAR}"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["sigil"], "${NOT_A_VAR}");
    }

    #[test]
    fn lowercase_and_non_strings_pass_through() {
        let v = json!({"sigil": "${lower}", "n": 3, "b": true});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result, v);
    }
}
