pub mod event_bus;
pub mod registry;
pub mod sdk;

pub use event_bus::{EventBus, EventListener};
pub use registry::PluginRegistry;
pub use sdk::{Plugin, PluginHost, SimplePlugin};
