//! `sigil-builtins`: the plugins a stock bot ships with.

pub mod admin;
pub mod avatar;
pub mod eightball;
pub mod mime;
pub mod roll;
pub mod weeb;
pub mod xkcd;

use std::sync::Arc;

use sigil_plugins::Plugin;

pub use avatar::avatar_plugin;
pub use admin::{name_plugin, say_plugin, status_plugin};
pub use eightball::EightBallPlugin;
pub use roll::RollPlugin;
pub use weeb::weeb_plugin;
pub use xkcd::XkcdPlugin;

/// Every built-in plugin, in load order.
pub fn builtin_plugins() -> Vec<Arc<dyn Plugin>> {
    vec![
        Arc::new(avatar_plugin()),
        Arc::new(EightBallPlugin),
        Arc::new(name_plugin()),
        Arc::new(RollPlugin),
        Arc::new(say_plugin()),
        Arc::new(status_plugin()),
        Arc::new(weeb_plugin()),
        Arc::new(XkcdPlugin),
    ]
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::*;

    #[tokio::test]
    async fn all_builtins_load_with_defaults() {
        let bot = bot_with(serde_json::json!({})).await;
        bot.load_plugins(builtin_plugins()).await.unwrap();

        for name in ["avatar", "8ball", "name", "roll", "say", "status", "weeb", "xkcd"] {
            assert!(bot.get_plugin(name).await.is_some(), "plugin {name} missing");
        }
        for name in ["help", "avatar", "8ball", "\u{1F3B1}", "name", "roll", "\u{1F3B2}", "say", "status", "xkcd"] {
            assert!(bot.get_command(name).await.is_some(), "command {name} missing");
        }
        assert!(bot.get_command("weeb").await.is_none());
    }
}
