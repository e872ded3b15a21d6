pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod types;

pub use detection::parse_invocation;
pub use dispatch::{CommandDispatcher, CommandHandler, DispatchOutcome};
pub use handlers::HelpHandler;
pub use registry::{CommandRegistry, WeakCommandRegistry};
pub use types::{Command, Invocation};
