//! In-memory transport for exercising commands and listeners without a
//! platform connection.
//!
//! ```
//! use sigil_core::testing::{Outbound, RecordingTransport};
//! use sigil_core::Transport;
//!
//! # tokio_test_block_on(async {
//! let transport = RecordingTransport::new("bot");
//! transport.send_message("chan", "hello").await.unwrap();
//! assert_eq!(transport.sent_texts(), vec!["hello".to_string()]);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::message::{AvatarImage, Embed};
use crate::traits::Transport;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Message { channel_id: String, text: String },
    Embed { channel_id: String, embed: Embed },
    Delete { channel_id: String, message_id: String },
    Nickname { channel_id: String, nickname: Option<String> },
    Status(Option<String>),
    Avatar(Option<AvatarImage>),
}

/// Transport that records every call instead of sending it.
pub struct RecordingTransport {
    user_id: String,
    calls: Mutex<Vec<Outbound>>,
    fail_sends: bool,
}

impl RecordingTransport {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), calls: Mutex::new(Vec::new()), fail_sends: false }
    }

    /// A transport whose text and embed sends always fail.
    pub fn failing(user_id: impl Into<String>) -> Self {
        Self { fail_sends: true, ..Self::new(user_id) }
    }

    pub fn calls(&self) -> Vec<Outbound> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Text of every plain message sent, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Outbound::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Every embed sent, in order.
    pub fn sent_embeds(&self) -> Vec<Embed> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Outbound::Embed { embed, .. } => Some(embed),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }

    fn record(&self, call: Outbound) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn current_user_id(&self) -> String {
        self.user_id.clone()
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<()> {
        if self.fail_sends {
            bail!("send to {channel_id} failed");
        }
        self.record(Outbound::Message { channel_id: channel_id.into(), text: text.into() });
        Ok(())
    }

    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<()> {
        if self.fail_sends {
            bail!("send to {channel_id} failed");
        }
        self.record(Outbound::Embed { channel_id: channel_id.into(), embed: embed.clone() });
        Ok(())
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()> {
        self.record(Outbound::Delete {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        });
        Ok(())
    }

    async fn set_nickname(&self, channel_id: &str, nickname: Option<&str>) -> Result<()> {
        self.record(Outbound::Nickname {
            channel_id: channel_id.into(),
            nickname: nickname.map(String::from),
        });
        Ok(())
    }

    async fn set_status(&self, status: Option<&str>) -> Result<()> {
        self.record(Outbound::Status(status.map(String::from)));
        Ok(())
    }

    async fn set_avatar(&self, image: Option<AvatarImage>) -> Result<()> {
        self.record(Outbound::Avatar(image));
        Ok(())
    }
}
