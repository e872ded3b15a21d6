//! Logging for errors that reach the runtime's error sink.

use tracing::error;

use crate::redact::redact_sensitive_data;

/// Full cause chain of `err`, one line, secrets scrubbed.
pub fn format_error(err: &anyhow::Error) -> String {
    redact_sensitive_data(&format!("{err:#}"))
}

/// Log one sink error at `error` level.
pub fn log_error(err: &anyhow::Error) {
    error!(target: "sigil_errors", error = %format_error(err), "Runtime error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn includes_context_chain() {
        let err = anyhow!("dice out of bounds").context("command \"roll\" failed");
        assert_eq!(format_error(&err), "command \"roll\" failed: dice out of bounds");
    }

    #[test]
    fn scrubs_secrets() {
        let err = anyhow!("401 for Bot MTA4NzY1NDMyMTA5ODc2NTQzMg.GaBcDe.abcdefghijklmnopqrstuvwxyz0123456");
        let text = format_error(&err);
        assert!(!text.contains("GaBcDe"));
        log_error(&err);
    }
}
