//! `xkcd`: post a comic as an embed.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header::LOCATION, redirect, Client, Url};
use serde::Deserialize;
use sigil_commands::{Command, CommandHandler};
use sigil_core::{Embed, InboundMessage, Transport};
use sigil_plugins::{Plugin, PluginHost};
use tracing::debug;

const BASE_URL: &str = "https://xkcd.com/";
const RANDOM_URL: &str = "https://c.xkcd.com/random/comic";

static COMIC_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9][0-9]*$").unwrap());

/// The comic metadata served at `/info.0.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComicInfo {
    pub year: String,
    pub month: String,
    pub day: String,
    pub title: String,
    pub alt: String,
    pub num: u32,
    pub img: String,
}

impl ComicInfo {
    pub fn embed(&self) -> Embed {
        Embed::new()
            .url(format!("{BASE_URL}{}/", self.num))
            .title(format!("xkcd: {}", self.title))
            .image(&self.img)
            .footer(format!("#{}, posted {}-{}-{}", self.num, self.year, self.month, self.day))
    }
}

/// Which comic the argument text asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComicRequest {
    Latest,
    Number(String),
    Random,
}

impl ComicRequest {
    /// `None` for argument text the command does not understand.
    pub fn parse(args: &str) -> Option<Self> {
        match args {
            "" => Some(Self::Latest),
            "random" => Some(Self::Random),
            n if COMIC_NUMBER.is_match(n) => Some(Self::Number(n.to_string())),
            _ => None,
        }
    }
}

pub struct XkcdClient {
    client: Client,
    /// Used only for the random endpoint, whose redirect target is the answer.
    no_redirect: Client,
    base_url: String,
    random_url: String,
}

impl XkcdClient {
    pub fn new() -> Result<Self> {
        Self::with_urls(BASE_URL, RANDOM_URL)
    }

    pub fn with_urls(base_url: impl Into<String>, random_url: impl Into<String>) -> Result<Self> {
        let no_redirect = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .context("failed to build xkcd client")?;
        Ok(Self {
            client: Client::new(),
            no_redirect,
            base_url: base_url.into(),
            random_url: random_url.into(),
        })
    }

    /// JSON endpoint for a comic; `None` is the latest one.
    pub fn info_url(&self, num: Option<&str>) -> String {
        match num {
            Some(n) => format!("{}{n}/info.0.json", self.base_url),
            None => format!("{}info.0.json", self.base_url),
        }
    }

    pub async fn fetch(&self, request: &ComicRequest) -> Result<ComicInfo> {
        let url = match request {
            ComicRequest::Latest => self.info_url(None),
            ComicRequest::Number(n) => self.info_url(Some(n)),
            ComicRequest::Random => self.random_comic_url().await?,
        };
        debug!(url = %url, "Fetching xkcd comic");

        self.client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("xkcd request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("xkcd request failed: {url}"))?
            .json::<ComicInfo>()
            .await
            .context("failed to decode xkcd comic info")
    }

    /// The random endpoint answers with a redirect to a comic page.
    async fn random_comic_url(&self) -> Result<String> {
        let resp = self
            .no_redirect
            .get(&self.random_url)
            .send()
            .await
            .context("xkcd random request failed")?;
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .context("xkcd random response had no Location header")?;
        info_url_from_redirect(resp.url(), location)
    }
}

/// Resolve a redirect `Location` (absolute or relative) against the request
/// URL and point it at the comic's JSON.
fn info_url_from_redirect(request_url: &Url, location: &str) -> Result<String> {
    let page = request_url
        .join(location)
        .with_context(|| format!("invalid xkcd redirect location {location:?}"))?;
    Ok(format!("{page}info.0.json"))
}

pub struct Xkcd {
    client: XkcdClient,
}

impl Xkcd {
    pub fn new(client: XkcdClient) -> Self {
        Self { client }
    }

    pub fn command(self) -> Command {
        Command::new("xkcd", Arc::new(self))
            .comment("get xkcd comics")
            .usage(["xkcd", "xkcd <number>", "xkcd random"])
            .description("Get xkcd comics.")
    }
}

#[async_trait]
impl CommandHandler for Xkcd {
    async fn execute(&self, session: &dyn Transport, msg: &InboundMessage) -> Result<()> {
        let Some(request) = ComicRequest::parse(&msg.content) else {
            return Ok(());
        };
        let info = self.client.fetch(&request).await?;
        session.send_embed(&msg.channel_id, &info.embed()).await
    }
}

pub struct XkcdPlugin;

#[async_trait]
impl Plugin for XkcdPlugin {
    fn name(&self) -> &str {
        "xkcd"
    }

    async fn load(&self, host: &dyn PluginHost) -> Result<()> {
        host.add_command(Xkcd::new(XkcdClient::new()?).command()).await;
        Ok(())
    }
}
