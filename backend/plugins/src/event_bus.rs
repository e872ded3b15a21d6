//! Event Bus
//!
//! Fans every raw platform event out to the listeners plugins subscribed.
//! Listeners run in subscription order against a snapshot of the list, so
//! no lock is held while one runs and a listener may subscribe another.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sigil_core::{RawEvent, Transport};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Receives every raw event, including ones that are not commands.
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn on_event(&self, session: &dyn Transport, event: &RawEvent) -> Result<()>;
}

#[derive(Default, Clone)]
pub struct EventBus {
    listeners: Arc<RwLock<Vec<Arc<dyn EventListener>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, listener: Arc<dyn EventListener>) {
        let mut listeners = self.listeners.write().await;
        listeners.push(listener);
        debug!(listeners = listeners.len(), "Event listener subscribed");
    }

    pub async fn len(&self) -> usize {
        self.listeners.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listeners.read().await.is_empty()
    }

    /// Deliver `event` to every listener. One listener failing does not stop
    /// the rest; the failures are returned for the caller to report.
    pub async fn publish(&self, session: &dyn Transport, event: &RawEvent) -> Vec<anyhow::Error> {
        let snapshot: Vec<_> = self.listeners.read().await.clone();

        let mut errors = Vec::new();
        for listener in snapshot {
            if let Err(e) = listener.on_event(session, event).await {
                warn!(event = %event.kind(), error = %e, "Event listener failed");
                errors.push(e.context(format!("listener failed on {} event", event.kind())));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use sigil_core::testing::RecordingTransport;
    use sigil_core::{Author, InboundMessage};
    use std::sync::Mutex;

    /// Appends its tag to a shared log on every event.
    struct Tagger {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl EventListener for Tagger {
        async fn on_event(&self, _session: &dyn Transport, _event: &RawEvent) -> Result<()> {
            self.log.lock().unwrap().push(self.tag);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl EventListener for Failing {
        async fn on_event(&self, _session: &dyn Transport, _event: &RawEvent) -> Result<()> {
            bail!("listener broke")
        }
    }

    /// Subscribes another listener the first time it sees an event.
    struct Spawner {
        bus: EventBus,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl EventListener for Spawner {
        async fn on_event(&self, _session: &dyn Transport, _event: &RawEvent) -> Result<()> {
            self.bus.subscribe(Arc::new(Tagger { tag: "late", log: self.log.clone() })).await;
            Ok(())
        }
    }

    fn event() -> RawEvent {
        RawEvent::MessageCreate(InboundMessage::new("m", "c", Author::new("u", "u"), "hello"))
    }

    #[tokio::test]
    async fn delivers_in_subscription_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            bus.subscribe(Arc::new(Tagger { tag, log: log.clone() })).await;
        }
        let session = RecordingTransport::new("bot");

        assert!(bus.publish(&session, &event()).await.is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn failure_does_not_stop_later_listeners() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Failing)).await;
        bus.subscribe(Arc::new(Tagger { tag: "after", log: log.clone() })).await;
        let session = RecordingTransport::new("bot");

        let errors = bus.publish(&session, &event()).await;
        assert_eq!(errors.len(), 1);
        assert!(format!("{:#}", errors[0]).contains("listener broke"));
        assert_eq!(*log.lock().unwrap(), vec!["after"]);
    }

    #[tokio::test]
    async fn subscribing_during_publish_applies_next_time() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Spawner { bus: bus.clone(), log: log.clone() })).await;
        let session = RecordingTransport::new("bot");

        bus.publish(&session, &event()).await;
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(bus.len().await, 2);

        bus.publish(&session, &event()).await;
        assert_eq!(*log.lock().unwrap(), vec!["late"]);
    }

    #[tokio::test]
    async fn publish_without_listeners() {
        let bus = EventBus::new();
        assert!(bus.is_empty().await);
        let session = RecordingTransport::new("bot");
        assert!(bus.publish(&session, &event()).await.is_empty());
    }
}
