//! Topic-based notification channel for the orrery time core.
//!
//! An explicit, owned event bus rather than process-wide shared state:
//! subscribers register against a topic and receive a cancellation handle,
//! so there is no hidden global coupling between the clock and its
//! listeners. Delivery is fan-out over [`crossbeam_channel`] unbounded
//! channels; a subscriber that dropped its receiver is pruned on the next
//! publish to that topic.

use std::collections::HashMap;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::trace;

/// Cancellation handle returned by [`EventBus::subscribe`].
///
/// Passing the handle back to [`EventBus::unsubscribe`] removes the
/// subscriber; the handle is consumed so a subscription cannot be
/// cancelled twice. Dropping the receiver instead is also fine; the
/// bus prunes disconnected subscribers lazily.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    topic: String,
}

impl Subscription {
    /// The topic this subscription is registered under.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Fan-out publish/subscribe bus keyed by topic string.
///
/// Single execution context by design: all operations take `&mut self`
/// and complete synchronously. The channels themselves are thread-safe,
/// so receivers may be handed to other threads if a host application
/// wants that, but the bus does no locking of its own.
#[derive(Debug)]
pub struct EventBus<T> {
    next_id: u64,
    topics: HashMap<String, Vec<(u64, Sender<T>)>>,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventBus<T> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            topics: HashMap::new(),
        }
    }

    /// Register a subscriber for `topic`.
    ///
    /// Returns the cancellation handle and the receiving end of the
    /// subscriber's channel.
    pub fn subscribe(&mut self, topic: &str) -> (Subscription, Receiver<T>) {
        let id = self.next_id;
        self.next_id += 1;

        let (tx, rx) = unbounded();
        self.topics.entry(topic.to_string()).or_default().push((id, tx));
        trace!(topic, id, "subscriber registered");

        (
            Subscription {
                id,
                topic: topic.to_string(),
            },
            rx,
        )
    }

    /// Remove the subscriber identified by `sub`.
    ///
    /// A handle whose subscriber was already pruned (dropped receiver) is
    /// accepted silently.
    pub fn unsubscribe(&mut self, sub: Subscription) {
        if let Some(subs) = self.topics.get_mut(&sub.topic) {
            subs.retain(|(id, _)| *id != sub.id);
            if subs.is_empty() {
                self.topics.remove(&sub.topic);
            }
        }
        trace!(topic = %sub.topic, id = sub.id, "subscriber removed");
    }

    /// Number of live subscribers currently registered for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }
}

impl<T: Clone> EventBus<T> {
    /// Deliver `payload` to every live subscriber of `topic`.
    ///
    /// Subscribers whose receiver has been dropped are removed. Returns
    /// the number of subscribers the payload was delivered to.
    pub fn publish(&mut self, topic: &str, payload: T) -> usize {
        let Some(subs) = self.topics.get_mut(topic) else {
            return 0;
        };

        let mut delivered = 0;
        subs.retain(|(_, tx)| match tx.send(payload.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => false,
        });
        if subs.is_empty() {
            self.topics.remove(topic);
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_fans_out_to_all_subscribers() {
        let mut bus: EventBus<u32> = EventBus::new();
        let (_sub_a, rx_a) = bus.subscribe("tick");
        let (_sub_b, rx_b) = bus.subscribe("tick");

        let delivered = bus.publish("tick", 7);
        assert_eq!(delivered, 2);
        assert_eq!(rx_a.try_recv(), Ok(7));
        assert_eq!(rx_b.try_recv(), Ok(7));
    }

    #[test]
    fn test_publish_respects_topics() {
        let mut bus: EventBus<u32> = EventBus::new();
        let (_sub, rx) = bus.subscribe("tick");

        assert_eq!(bus.publish("other", 1), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus: EventBus<u32> = EventBus::new();
        let (sub, rx) = bus.subscribe("tick");

        bus.publish("tick", 1);
        bus.unsubscribe(sub);
        bus.publish("tick", 2);

        assert_eq!(rx.try_recv(), Ok(1));
        assert!(rx.try_recv().is_err());
        assert_eq!(bus.subscriber_count("tick"), 0);
    }

    #[test]
    fn test_dropped_receiver_is_pruned_on_publish() {
        let mut bus: EventBus<u32> = EventBus::new();
        let (_sub_a, rx_a) = bus.subscribe("tick");
        let (_sub_b, rx_b) = bus.subscribe("tick");
        drop(rx_b);

        assert_eq!(bus.publish("tick", 3), 1);
        assert_eq!(rx_a.try_recv(), Ok(3));
        assert_eq!(bus.subscriber_count("tick"), 1);
    }

    #[test]
    fn test_subscription_ids_are_distinct() {
        let mut bus: EventBus<u32> = EventBus::new();
        let (sub_a, _rx_a) = bus.subscribe("tick");
        let (sub_b, rx_b) = bus.subscribe("tick");

        // Cancelling A must not disturb B.
        bus.unsubscribe(sub_a);
        bus.publish("tick", 9);
        assert_eq!(rx_b.try_recv(), Ok(9));
        drop(sub_b);
    }
}
