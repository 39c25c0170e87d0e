//! Typed event channel towards the UI layer

use mailsync_domain::constants::EVENT_CHANNEL_CAPACITY;
use mailsync_domain::LifecycleEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Broadcast bus for [`LifecycleEvent`]s
///
/// Slow receivers lag and skip events rather than blocking the publisher.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish `event`, returning how many receivers got it.
    pub fn publish(&self, event: LifecycleEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!(?event, "no event subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
