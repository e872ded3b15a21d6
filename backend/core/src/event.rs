use serde::{Deserialize, Serialize};

use crate::message::InboundMessage;

/// An event delivered by the transport.
///
/// Plugins may subscribe to every variant; only `MessageCreate` is routed
/// through command dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawEvent {
    /// The session finished connecting as the given user.
    Ready { user_id: String, user_name: String },
    /// A message was posted in a channel the bot can see.
    MessageCreate(InboundMessage),
    /// Any other platform event, passed through untyped.
    Other { kind: String, payload: serde_json::Value },
}

impl RawEvent {
    pub fn kind(&self) -> &str {
        match self {
            RawEvent::Ready { .. } => "ready",
            RawEvent::MessageCreate(_) => "message_create",
            RawEvent::Other { kind, .. } => kind,
        }
    }

    pub fn as_message(&self) -> Option<&InboundMessage> {
        match self {
            RawEvent::MessageCreate(msg) => Some(msg),
            _ => None,
        }
    }
}

impl std::fmt::Display for RawEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}
