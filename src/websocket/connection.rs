use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::ChannelEvent;

pub type HandlerId = Uuid;
pub type ChannelSender = mpsc::UnboundedSender<ChannelEvent>;

/// Process-wide realtime channel. Every `on` hands back a handler id that
/// must be passed to exactly one `off`.
#[derive(Clone)]
pub struct RealtimeChannel {
    handlers: Arc<DashMap<&'static str, DashMap<HandlerId, ChannelSender>>>,
}

impl RealtimeChannel {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
        }
    }

    /// Register a handler for `event`
    pub fn on(&self, event: &'static str, sender: ChannelSender) -> HandlerId {
        let id = Uuid::new_v4();
        self.handlers.entry(event).or_default().insert(id, sender);
        tracing::debug!("Handler {} registered for {}", id, event);
        id
    }

    /// Deregister a handler. Returns false if it was not registered.
    pub fn off(&self, event: &'static str, id: HandlerId) -> bool {
        let removed = self
            .handlers
            .get(event)
            .map(|handlers| handlers.remove(&id).is_some())
            .unwrap_or(false);

        if removed {
            tracing::debug!("Handler {} deregistered from {}", id, event);
        }
        removed
    }

    /// Deliver an event to every handler registered for it. Returns the
    /// number of handlers reached.
    pub fn emit(&self, event: ChannelEvent) -> usize {
        let Some(handlers) = self.handlers.get(event.name()) else {
            return 0;
        };

        let mut delivered = 0;
        for entry in handlers.iter() {
            if entry.value().send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers
            .get(event)
            .map(|handlers| handlers.len())
            .unwrap_or(0)
    }
}

impl Default for RealtimeChannel {
    fn default() -> Self {
        Self::new()
    }
}
