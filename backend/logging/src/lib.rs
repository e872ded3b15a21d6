//! Structured logging for sigil.
//!
//! Handles subscriber setup, log file rotation and redaction of secrets in
//! error text.

pub mod error_log;
pub mod logger;
pub mod redact;

pub use error_log::{format_error, log_error};
pub use logger::{init_logger, LOG_FILE_NAME};
pub use redact::redact_sensitive_data;
