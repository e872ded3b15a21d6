//! Log Redaction Layer
//!
//! Scrubs bot tokens and bearer credentials from text before it is logged.

use regex::Regex;
use std::sync::LazyLock;

/// Three dot-separated base64url segments, the shape of a Discord bot token.
static BOT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_-]{23,28}\.[A-Za-z0-9_-]{6,7}\.[A-Za-z0-9_-]{27,}").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Bearer|Bot)\s+[a-zA-Z0-9\-\._~+/]{16,}=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BOT_TOKEN_RE.replace_all(input, "[REDACTED_TOKEN]");
    BEARER_RE.replace_all(&redacted, "$1 [REDACTED_TOKEN]").into_owned()
}
