//! Delivery of newly built renderers to live viewers.
//!
//! Sends happen inside the mutating call, so a subscriber never receives a
//! renderer before the index state it was frozen from is in place.

use crate::renderer::Renderer;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Subscription identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub_{}", self.0)
    }
}

/// Receiving end of a renderer subscription
#[derive(Debug)]
pub struct SnapshotSubscription {
    id: SubscriptionId,
    receiver: mpsc::UnboundedReceiver<Arc<Renderer>>,
}

impl SnapshotSubscription {
    /// Identifier to pass to `unsubscribe`
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next renderer.
    ///
    /// Returns `None` once the subscription was removed and every queued
    /// renderer has been received.
    pub async fn recv(&mut self) -> Option<Arc<Renderer>> {
        self.receiver.recv().await
    }

    /// Take the next queued renderer without waiting
    pub fn try_recv(&mut self) -> Option<Arc<Renderer>> {
        self.receiver.try_recv().ok()
    }

    /// Take every queued renderer
    pub fn drain(&mut self) -> Vec<Arc<Renderer>> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Registry of live subscribers
#[derive(Debug, Default)]
pub struct Subscriptions {
    next_id: u64,
    senders: Vec<(SubscriptionId, mpsc::UnboundedSender<Arc<Renderer>>)>,
}

impl Subscriptions {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    ///
    /// Each subscriber gets its own unbounded queue. Publishing never blocks
    /// or drops a renderer; renderers pile up until the receiver reads them
    /// or is dropped, so a subscriber that stops reading holds every renderer
    /// (and the resource view it pins) published after that point.
    pub fn subscribe(&mut self) -> SnapshotSubscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (sender, receiver) = mpsc::unbounded_channel();
        self.senders.push((id, sender));
        SnapshotSubscription { id, receiver }
    }

    /// Remove a subscriber; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.senders.len();
        self.senders.retain(|(sid, _)| *sid != id);
        self.senders.len() != before
    }

    /// Deliver a renderer to every subscriber, dropping closed ones
    pub fn publish(&mut self, renderer: &Arc<Renderer>) {
        self.senders.retain(|(id, sender)| {
            let open = sender.send(Arc::clone(renderer)).is_ok();
            if !open {
                tracing::debug!(subscription = %id, "subscriber dropped, removing");
            }
            open
        });
    }

    /// Number of registered subscribers
    #[must_use]
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    /// Check if nobody is subscribed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
