pub mod error;
pub mod event;
pub mod message;
pub mod sink;
pub mod testing;
pub mod traits;

pub use error::BotError;
pub use event::RawEvent;
pub use message::{Attachment, Author, AvatarImage, Embed, EmbedField, InboundMessage};
pub use sink::ErrorSink;
pub use traits::Transport;
