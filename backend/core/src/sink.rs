use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Single-slot, best-effort fan-in point for runtime errors.
///
/// Dispatch failures and plugin background failures are funnelled here. One
/// consumer channel may be registered at a time; registering again replaces
/// it. `send` never blocks and never queues: when there is no consumer or
/// its buffer is full, the error is dropped.
#[derive(Clone, Default)]
pub struct ErrorSink {
    slot: Arc<RwLock<Option<mpsc::Sender<anyhow::Error>>>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registered consumer.
    pub fn register(&self, consumer: mpsc::Sender<anyhow::Error>) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(consumer);
        debug!("Error consumer registered");
    }

    /// Remove the registered consumer, if any.
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    pub fn has_consumer(&self) -> bool {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Offer an error to the consumer. Returns whether it was accepted.
    pub fn send(&self, err: anyhow::Error) -> bool {
        let consumer = self.slot.read().unwrap_or_else(|e| e.into_inner()).clone();
        let Some(consumer) = consumer else {
            trace!(error = %err, "No error consumer; dropping");
            return false;
        };
        match consumer.try_send(err) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(err)) => {
                trace!(error = %err, "Error consumer full; dropping");
                false
            }
            Err(mpsc::error::TrySendError::Closed(err)) => {
                trace!(error = %err, "Error consumer closed; dropping");
                false
            }
        }
    }
}

impl std::fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorSink")
            .field("has_consumer", &self.has_consumer())
            .finish()
    }
}
