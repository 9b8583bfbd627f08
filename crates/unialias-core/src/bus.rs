//! Cross-window event channel.
//!
//! Windows never share memory; they coordinate only by publishing
//! [`AppEvent`]s here. Delivery follows broadcast semantics: a subscription
//! sees every event published after it was created and nothing before, so a
//! window created late only catches up from its next publish onwards.
//!
//! A [`Subscription`] belongs to one window and lists the event kinds it
//! wants. Dropping it (when the window closes) disposes of it.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, warn};
use unialias_types::{AppEvent, EventKind, WindowLabel};

const CHANNEL_CAPACITY: usize = 64;

/// Process-wide publish/subscribe bus. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventChannel {
    tx: broadcast::Sender<AppEvent>,
}

impl EventChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to every live subscription and return how many received it.
    ///
    /// Publishing with nobody listening is not an error.
    pub fn publish(&self, event: AppEvent) -> usize {
        let kind = event.kind();
        if let Ok(receivers) = self.tx.send(event) {
            debug!("Published {kind} to {receivers} subscriber(s)");
            receivers
        } else {
            debug!("Published {kind} with no subscribers");
            0
        }
    }

    /// Subscribe `owner` to the given event kinds.
    #[must_use]
    pub fn subscribe(&self, owner: WindowLabel, kinds: &[EventKind]) -> Subscription {
        debug!("{owner} subscribed to {kinds:?}");
        Subscription {
            owner,
            kinds: kinds.to_vec(),
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions across all windows
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// One window's subscription list
#[derive(Debug)]
pub struct Subscription {
    owner: WindowLabel,
    kinds: Vec<EventKind>,
    rx: broadcast::Receiver<AppEvent>,
}

impl Subscription {
    #[must_use]
    pub fn owner(&self) -> WindowLabel {
        self.owner
    }

    #[must_use]
    pub fn accepts(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Wait for the next event of a subscribed kind.
    ///
    /// Returns `None` once every publisher is gone.
    pub async fn recv(&mut self) -> Option<AppEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.accepts(event.kind()) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("{} lagged behind, {skipped} event(s) dropped", self.owner);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next already-published event of a subscribed kind, if any.
    pub fn try_recv(&mut self) -> Option<AppEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.accepts(event.kind()) => return Some(event),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("{} lagged behind, {skipped} event(s) dropped", self.owner);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!("{} subscription disposed", self.owner);
    }
}
