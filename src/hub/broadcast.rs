//! Broadcast implementation

use crossbeam::channel::{self, SendTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;

use super::ChangeReceiver;
use crate::config::BroadcastPolicy;

/// Set of subscriber channels
pub struct NotificationHub {
    policy: BroadcastPolicy,

    /// Registration order is delivery order
    subscribers: Mutex<Vec<Sender<()>>>,
}

impl NotificationHub {
    pub fn new(policy: BroadcastPolicy) -> Self {
        Self {
            policy,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> ChangeReceiver {
        let (tx, rx) = match self.policy {
            BroadcastPolicy::Coalesce => channel::bounded(1),
            BroadcastPolicy::Timeout(_) | BroadcastPolicy::Block => channel::bounded(0),
        };
        self.subscribers.lock().push(tx);
        rx
    }

    /// Signal every subscriber
    ///
    /// Returns the number of subscribers that received the signal or
    /// already had one pending.
    pub fn broadcast(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        let mut delivered = 0;

        subscribers.retain(|tx| match self.deliver(tx) {
            Delivery::Delivered => {
                delivered += 1;
                true
            }
            Delivery::Skipped => true,
            Delivery::Disconnected => false,
        });

        tracing::trace!(delivered, subscribers = subscribers.len(), "broadcast change");
        delivered
    }

    fn deliver(&self, tx: &Sender<()>) -> Delivery {
        match self.policy {
            BroadcastPolicy::Coalesce => match tx.try_send(()) {
                // A pending signal already covers this change
                Ok(()) | Err(TrySendError::Full(())) => Delivery::Delivered,
                Err(TrySendError::Disconnected(())) => Delivery::Disconnected,
            },
            BroadcastPolicy::Timeout(timeout) => match tx.send_timeout((), timeout) {
                Ok(()) => Delivery::Delivered,
                Err(SendTimeoutError::Timeout(())) => {
                    tracing::warn!(?timeout, "subscriber not ready, skipping notification");
                    Delivery::Skipped
                }
                Err(SendTimeoutError::Disconnected(())) => Delivery::Disconnected,
            },
            BroadcastPolicy::Block => match tx.send(()) {
                Ok(()) => Delivery::Delivered,
                Err(_) => Delivery::Disconnected,
            },
        }
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn policy(&self) -> BroadcastPolicy {
        self.policy
    }
}

enum Delivery {
    Delivered,
    Skipped,
    Disconnected,
}
