//! `sigil-runtime`: the bot object plugins load into and transports feed.

pub mod bot;

pub use bot::{bot_from_file, Bot};
