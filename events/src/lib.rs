//! In-process publish/subscribe event bus with bounded, drop-on-full subscriber
//! queues.
//!
//! This is the fan-out primitive the rest of the gateway is built on: the SSE
//! layer uses it to push HTML frames to browsers, and nothing here knows what
//! an HTML frame is. A `send` is a non-blocking offer to every live
//! subscriber; a subscriber whose queue is full is dropped rather than
//! allowed to slow down the rest.
//!
//! # Ordering
//!
//! Sends are serialised under a single lock, so delivery across subscribers
//! is totally ordered, a superset of the spec's "relative order of delivered
//! items per subscriber" guarantee. Within one subscriber the bounded channel
//! preserves publish order.

use log::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Default bounded capacity for a subscriber's queue.
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

struct Subscriber<T> {
    id: SubscriberId,
    sender: mpsc::Sender<T>,
}

struct Inner<T> {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber<T>>>,
    capacity: usize,
}

impl<T> Inner<T> {
    fn remove(&self, id: SubscriberId) {
        self.subscribers.lock().unwrap().retain(|s| s.id != id);
    }
}

/// A publish/subscribe bus for messages of type `T`.
///
/// Cloning an `EventBus` shares the same subscriber registry; clone it freely
/// into every component that needs to publish.
pub struct EventBus<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A live subscription. Dropping it unregisters the subscriber.
pub struct Subscription<T> {
    id: SubscriberId,
    receiver: mpsc::Receiver<T>,
    bus: Arc<Inner<T>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Await the next message published to this subscription.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.bus.remove(self.id);
    }
}

impl<T: Clone + Send + 'static> EventBus<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(0),
                subscribers: Mutex::new(Vec::new()),
                capacity,
            }),
        }
    }

    /// Register a new subscriber and return a handle carrying its bounded queue.
    pub fn listen(&self) -> Subscription<T> {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.inner.capacity);
        self.inner
            .subscribers
            .lock()
            .unwrap()
            .push(Subscriber { id, sender });
        Subscription {
            id,
            receiver,
            bus: Arc::clone(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().unwrap().len()
    }

    /// Offer `msg` to every live subscriber. Non-blocking: a subscriber whose
    /// queue is full is considered dead and dropped, silently, so one slow
    /// reader never blocks the others.
    pub fn send(&self, msg: T) {
        let mut subs = self.inner.subscribers.lock().unwrap();
        subs.retain(|sub| match sub.sender.try_send(msg.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("subscriber queue full, dropping subscription {:?}", sub.id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }
}

impl<T: Clone + Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_all_live_subscribers() {
        let bus: EventBus<u32> = EventBus::new();
        let mut a = bus.listen();
        let mut b = bus.listen();
        bus.send(7);
        assert_eq!(a.recv().await, Some(7));
        assert_eq!(b.recv().await, Some(7));
    }

    #[tokio::test]
    async fn full_queue_drops_only_that_subscriber() {
        let bus: EventBus<u32> = EventBus::with_capacity(1);
        let mut slow = bus.listen();
        let mut fast = bus.listen();
        bus.send(1); // fills both queues (capacity 1)
        bus.send(2); // slow's queue is full, slow gets dropped; fast's too (cap 1)
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(slow.recv().await, Some(1));
        assert_eq!(fast.recv().await, Some(1));
    }

    #[tokio::test]
    async fn dropping_subscription_unregisters_it() {
        let bus: EventBus<u32> = EventBus::new();
        let sub = bus.listen();
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn preserves_publisher_order_per_subscriber() {
        let bus: EventBus<u32> = EventBus::with_capacity(10);
        let mut sub = bus.listen();
        for i in 0..5 {
            bus.send(i);
        }
        for i in 0..5 {
            assert_eq!(sub.recv().await, Some(i));
        }
    }
}
