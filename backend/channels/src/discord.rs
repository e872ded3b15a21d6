use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use serenity::builder::{CreateAttachment, CreateMessage, EditProfile};
use serenity::gateway::{ActivityData, ShardManager};
use serenity::model::channel::{Message as DiscordMessage, Reaction};
use serenity::model::gateway::Ready;
use serenity::model::id::{ChannelId, MessageId};
use serenity::prelude::*;
use sigil_core::{Attachment, Author, AvatarImage, Embed, InboundMessage, RawEvent, Transport};
use sigil_runtime::Bot;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info};

use crate::discord_embeds::to_create_embed;
use crate::ChannelAdapter;

fn snowflake(id: &str, what: &str) -> anyhow::Result<NonZeroU64> {
    id.parse().with_context(|| format!("invalid {what} id {id:?}"))
}

fn channel_id(id: &str) -> anyhow::Result<ChannelId> {
    snowflake(id, "channel").map(ChannelId::from)
}

fn message_id(id: &str) -> anyhow::Result<MessageId> {
    snowflake(id, "message").map(MessageId::from)
}

fn inbound(msg: &DiscordMessage) -> InboundMessage {
    InboundMessage {
        id: msg.id.to_string(),
        channel_id: msg.channel_id.to_string(),
        author: Author {
            id: msg.author.id.to_string(),
            name: msg.author.name.clone(),
            bot: msg.author.bot,
        },
        content: msg.content.clone(),
        attachments: msg
            .attachments
            .iter()
            .map(|a| Attachment { url: a.url.clone(), filename: a.filename.clone() })
            .collect(),
    }
}

/// The per-event serenity context, seen through the `Transport` interface.
pub struct DiscordSession {
    ctx: Context,
}

impl DiscordSession {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Transport for DiscordSession {
    fn current_user_id(&self) -> String {
        self.ctx.cache.current_user().id.to_string()
    }

    async fn send_message(&self, channel: &str, text: &str) -> anyhow::Result<()> {
        channel_id(channel)?
            .say(&self.ctx.http, text)
            .await
            .context("send message failed")?;
        Ok(())
    }

    async fn send_embed(&self, channel: &str, embed: &Embed) -> anyhow::Result<()> {
        let message = CreateMessage::new().embed(to_create_embed(embed));
        channel_id(channel)?
            .send_message(&self.ctx.http, message)
            .await
            .context("send embed failed")?;
        Ok(())
    }

    async fn delete_message(&self, channel: &str, message: &str) -> anyhow::Result<()> {
        channel_id(channel)?
            .delete_message(&self.ctx.http, message_id(message)?)
            .await
            .context("delete message failed")
    }

    async fn set_nickname(&self, channel: &str, nickname: Option<&str>) -> anyhow::Result<()> {
        let guild_channel = channel_id(channel)?
            .to_channel(&self.ctx)
            .await
            .context("channel lookup failed")?
            .guild()
            .context("nicknames can only be set in a guild channel")?;
        guild_channel
            .guild_id
            .edit_nickname(&self.ctx.http, nickname)
            .await
            .context("set nickname failed")
    }

    async fn set_status(&self, status: Option<&str>) -> anyhow::Result<()> {
        self.ctx.set_activity(status.map(ActivityData::playing));
        Ok(())
    }

    async fn set_avatar(&self, image: Option<AvatarImage>) -> anyhow::Result<()> {
        let profile = match image {
            Some(image) => {
                let ext = image.mime.trim_start_matches("image/");
                let attachment = CreateAttachment::bytes(image.bytes, format!("avatar.{ext}"));
                EditProfile::new().avatar(&attachment)
            }
            None => EditProfile::new().delete_avatar(),
        };
        let mut user = self.ctx.cache.current_user().clone();
        user.edit(&self.ctx, profile).await.context("set avatar failed")
    }
}

struct Handler {
    bot: Arc<Bot>,
}

impl Handler {
    async fn deliver(&self, ctx: Context, event: RawEvent) {
        let session = DiscordSession::new(ctx);
        if let Some(outcome) = self.bot.handle_event(&session, &event).await {
            debug!(?outcome, "Message handled");
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: DiscordMessage) {
        debug!(channel = %msg.channel_id, author = %msg.author.id, "Received Discord message");
        self.deliver(ctx, RawEvent::MessageCreate(inbound(&msg))).await;
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        let payload = serde_json::to_value(&reaction).unwrap_or_default();
        self.deliver(ctx, RawEvent::Other { kind: "reaction_add".into(), payload }).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        let event = RawEvent::Ready { user_id: ready.user.id.to_string(), user_name: ready.user.name.clone() };
        self.deliver(ctx, event).await;
    }
}

pub struct DiscordAdapter {
    token: String,
    bot: Arc<Bot>,
    shard_manager: AsyncMutex<Option<Arc<ShardManager>>>,
}

impl DiscordAdapter {
    pub fn new(token: impl Into<String>, bot: Arc<Bot>) -> Self {
        Self { token: token.into(), bot, shard_manager: AsyncMutex::new(None) }
    }
}

#[async_trait]
impl ChannelAdapter for DiscordAdapter {
    fn name(&self) -> &str {
        "discord"
    }

    async fn start(&self) -> anyhow::Result<()> {
        info!("Starting Discord adapter");

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = Client::builder(&self.token, intents)
            .event_handler(Handler { bot: self.bot.clone() })
            .await
            .context("failed to build Discord client")?;

        *self.shard_manager.lock().await = Some(client.shard_manager.clone());

        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            anyhow::bail!("Discord client error: {:?}", why);
        }

        Ok(())
    }

    async fn shutdown(&self) {
        if let Some(manager) = self.shard_manager.lock().await.take() {
            info!("Shutting down Discord shards");
            manager.shutdown_all().await;
        }
    }
}
