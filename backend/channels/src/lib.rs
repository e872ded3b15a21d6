use async_trait::async_trait;

pub mod discord;
pub mod discord_embeds;

pub use discord::{DiscordAdapter, DiscordSession};

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Connect and deliver events until the connection ends or `shutdown`
    /// is called.
    async fn start(&self) -> anyhow::Result<()>;

    /// Close the connection. A no-op if `start` has not connected yet.
    async fn shutdown(&self);
}
