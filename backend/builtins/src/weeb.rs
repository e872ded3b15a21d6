//! Calls out anyone who posts Japanese text, at most once a minute each.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sigil_core::{RawEvent, Transport};
use sigil_plugins::{EventListener, SimplePlugin};

static JAPANESE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Han}\p{Hiragana}\p{Katakana}]").unwrap());

const COOLDOWN: Duration = Duration::from_secs(60);

pub fn contains_japanese(text: &str) -> bool {
    JAPANESE.is_match(text)
}

pub struct Weeb {
    cooldown: Duration,
    last_callout: Mutex<HashMap<String, Instant>>,
}

impl Weeb {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown, last_callout: Mutex::new(HashMap::new()) }
    }

    /// Record a callout for `author` unless one happened within the cooldown.
    /// Expired entries are dropped on the way.
    fn claim(&self, author: &str, now: Instant) -> bool {
        let mut last = self.last_callout.lock().unwrap_or_else(|e| e.into_inner());
        last.retain(|_, at| now.duration_since(*at) < self.cooldown);
        if last.contains_key(author) {
            return false;
        }
        last.insert(author.to_string(), now);
        true
    }
}

#[async_trait]
impl EventListener for Weeb {
    async fn on_event(&self, session: &dyn Transport, event: &RawEvent) -> Result<()> {
        let Some(msg) = event.as_message() else {
            return Ok(());
        };
        if msg.author.id == session.current_user_id() || !contains_japanese(&msg.content) {
            return Ok(());
        }
        if !self.claim(&msg.author.id, Instant::now()) {
            return Ok(());
        }
        let text = format!("{} is a filthy WEEB!", msg.author.mention());
        session.send_message(&msg.channel_id, &text).await
    }
}

pub fn weeb_plugin() -> SimplePlugin {
    SimplePlugin::new("weeb").listener(Arc::new(Weeb::new(COOLDOWN)))
}
