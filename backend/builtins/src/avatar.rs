//! `avatar`: replace or reset the bot's profile picture.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use sigil_commands::{Command, CommandHandler};
use sigil_core::{AvatarImage, InboundMessage, Transport};
use sigil_plugins::SimplePlugin;
use tracing::info;

use crate::mime::{is_avatar_type, sniff_mime_type};

pub struct Avatar {
    client: Client,
}

impl Avatar {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("avatar download failed")?
            .error_for_status()
            .context("avatar download failed")?;
        Ok(resp.bytes().await.context("avatar download failed")?.to_vec())
    }
}

/// Check downloaded bytes are an image the platform accepts.
pub fn avatar_image(bytes: Vec<u8>) -> Result<AvatarImage> {
    let mime = sniff_mime_type(&bytes);
    if !is_avatar_type(mime) {
        bail!("invalid MIME type: {mime}");
    }
    Ok(AvatarImage { mime, bytes })
}

#[async_trait]
impl CommandHandler for Avatar {
    async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
        let image = match msg.attachments.as_slice() {
            [] => None,
            [attachment] => Some(avatar_image(self.download(&attachment.url).await?)?),
            _ => bail!("more than one attachment"),
        };

        info!(reset = image.is_none(), "Updating avatar");
        session.set_avatar(image).await?;
        session.delete_message(&msg.channel_id, &msg.id).await
    }
}

pub fn avatar_plugin() -> SimplePlugin {
    SimplePlugin::new("avatar").command(
        Command::new("avatar", Arc::new(Avatar::new(Client::new())))
            .comment("change avatar")
            .usage(["avatar"])
            .description(
                "Change the bot's avatar to the attached image or reset it to default if no image is attached with the command.",
            )
            .owner_only(),
    )
}
