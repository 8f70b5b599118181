//! Notification Hub Module
//!
//! Fans a "document changed" signal out to every subscriber.
//!
//! ## Delivery
//! Subscribers are signalled in registration order, under the hub lock, by
//! whichever thread triggered the change (a saving caller or the watcher).
//! How long a broadcast may wait on a subscriber is set by
//! [`BroadcastPolicy`](crate::config::BroadcastPolicy).
//!
//! A subscriber is dropped from the list once its receiver has been dropped.

mod broadcast;

pub use broadcast::NotificationHub;

/// Signal receiver handed to subscribers; one `()` per change event
pub type ChangeReceiver = crossbeam::channel::Receiver<()>;
