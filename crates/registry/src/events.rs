//! Lifecycle events published by the registry.
//!
//! Consumers call [`EventBus::subscribe`] and receive every event emitted
//! after subscription. Emitting with no subscribers is not an error.

use tokio::sync::broadcast;
use tracing::trace;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// Initial state established, or an activation found nothing to select
    Loaded,
    HostAdded { url: String },
    HostRemoved { url: String },
    ActiveChanged { url: String },
    ActiveCleared,
    TitleChanged { url: String, title: String },
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<RegistryEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: RegistryEvent) {
        trace!("Emitting registry event: {:?}", event);
        let _ = self.tx.send(event);
    }

    pub fn emit_all(&self, events: impl IntoIterator<Item = RegistryEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}
