use anyhow::Result;
use async_trait::async_trait;

use crate::message::{AvatarImage, Embed};

/// Outbound half of a platform session.
///
/// The runtime never talks to the platform directly; every reply a command
/// or listener produces goes through this trait. Each call is a single
/// request/response with no retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Identity of the account this session is logged in as.
    fn current_user_id(&self) -> String;

    /// Post a plain-text message.
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<()>;

    /// Post rich structured content.
    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<()>;

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()>;

    /// Change the bot's nickname in the guild that owns `channel_id`.
    /// `None` resets it.
    async fn set_nickname(&self, channel_id: &str, nickname: Option<&str>) -> Result<()>;

    /// Set the "playing" status line. `None` clears it.
    async fn set_status(&self, status: Option<&str>) -> Result<()>;

    /// Replace the account avatar. `None` restores the platform default.
    async fn set_avatar(&self, image: Option<AvatarImage>) -> Result<()>;
}
