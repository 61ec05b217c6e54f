//! Typed fan-out to subscribers.
//!
//! Each subscriber owns an unbounded receiver; [`Broadcaster::emit`] clones
//! the value into every live one and prunes subscribers whose receiver was
//! dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use tp_core::FxHashMap;

/// Identifies one subscription for [`Broadcaster::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

/// The receiving end of a subscription.
#[derive(Debug)]
pub struct Subscription<T> {
    id: SubscriberId,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Returns the id to unsubscribe with.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next value. Returns `None` after unsubscribing or once
    /// the broadcaster is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Takes the next value if one is queued.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Drains every queued value, keeping only the last.
    pub fn latest(&mut self) -> Option<T> {
        let mut last = None;
        while let Ok(value) = self.rx.try_recv() {
            last = Some(value);
        }
        last
    }
}

/// A registry of subscribers for values of type `T`.
///
/// # Examples
///
/// ```
/// use tp_engine::Broadcaster;
///
/// let broadcaster = Broadcaster::new();
/// let mut sub = broadcaster.subscribe();
/// assert_eq!(broadcaster.emit(7_u32), 1);
/// assert_eq!(sub.try_recv(), Some(7));
///
/// assert!(broadcaster.unsubscribe(sub.id()));
/// assert_eq!(broadcaster.emit(8), 0);
/// ```
#[derive(Debug)]
pub struct Broadcaster<T> {
    next_id: AtomicU64,
    subscribers: Mutex<FxHashMap<SubscriberId, mpsc::UnboundedSender<T>>>,
}

impl<T> Default for Broadcaster<T> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            subscribers: Mutex::new(FxHashMap::default()),
        }
    }
}

impl<T: Clone> Broadcaster<T> {
    /// Creates a broadcaster with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Subscription<T> {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().insert(id, tx);
        trace!(id = id.0, "Subscriber added");
        Subscription { id, rx }
    }

    /// Removes a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().remove(&id).is_some()
    }

    /// Sends `value` to every subscriber and returns how many received it.
    pub fn emit(&self, value: T) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|id, tx| {
            let alive = tx.send(value.clone()).is_ok();
            if !alive {
                trace!(id = id.0, "Pruned closed subscriber");
            }
            alive
        });
        subscribers.len()
    }

    /// Returns the number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_fans_out_to_all() {
        let broadcaster = Broadcaster::new();
        let mut a = broadcaster.subscribe();
        let mut b = broadcaster.subscribe();
        assert_ne!(a.id(), b.id());

        assert_eq!(broadcaster.emit("refresh"), 2);
        assert_eq!(a.try_recv(), Some("refresh"));
        assert_eq!(b.try_recv(), Some("refresh"));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let broadcaster = Broadcaster::new();
        let _kept = broadcaster.subscribe();
        let dropped = broadcaster.subscribe();
        drop(dropped);

        assert_eq!(broadcaster.emit(1), 1);
        assert_eq!(broadcaster.subscriber_count(), 1);
    }

    #[test]
    fn test_unsubscribe_closes_receiver() {
        let broadcaster = Broadcaster::new();
        let mut sub = broadcaster.subscribe();
        assert!(broadcaster.unsubscribe(sub.id()));
        assert!(!broadcaster.unsubscribe(sub.id()));
        broadcaster.emit(1);
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn test_latest_keeps_last() {
        let broadcaster = Broadcaster::new();
        let mut sub = broadcaster.subscribe();
        for n in 0..5 {
            broadcaster.emit(n);
        }
        assert_eq!(sub.latest(), Some(4));
        assert_eq!(sub.try_recv(), None);
    }
}
