//! Typed event channel between the transport and a screen.
//!
//! Transport tasks publish [`TransportEvent`]s through an [`EventPublisher`]
//! from any thread; a screen holds one [`Subscription`] for its lifetime and
//! drops it at teardown. Every subscription has its own unbounded
//! [`tokio::sync::mpsc`] queue, so events are delivered in publication order
//! and a slow subscriber never loses one. The capacity only sets the backlog
//! at which a lagging subscriber is reported.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use bgx_core::TransportEvent;
use tokio::sync::mpsc;

/// Default backlog per subscriber before it is reported as lagging.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug)]
struct Subscriber {
    sender: mpsc::UnboundedSender<TransportEvent>,
    backlog: Arc<AtomicUsize>,
}

#[derive(Debug)]
struct Registry {
    subscribers: Vec<Subscriber>,
    capacity: usize,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out channel of transport events.
#[derive(Debug, Clone)]
pub struct EventChannel {
    registry: Arc<Mutex<Registry>>,
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventChannel {
    /// Create a channel that reports subscribers more than `capacity` events
    /// behind.
    pub fn new(capacity: usize) -> Self {
        let registry = Registry { subscribers: Vec::new(), capacity: capacity.max(1) };
        Self { registry: Arc::new(Mutex::new(registry)) }
    }

    /// Publisher handle for a transport.
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher { registry: Arc::clone(&self.registry) }
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let backlog = Arc::new(AtomicUsize::new(0));
        lock(&self.registry).subscribers.push(Subscriber { sender, backlog: Arc::clone(&backlog) });
        Subscription { receiver: Some(receiver), backlog }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).subscribers.iter().filter(|s| !s.sender.is_closed()).count()
    }
}

/// Publishing side, held by the transport.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    registry: Arc<Mutex<Registry>>,
}

impl EventPublisher {
    /// Publish an event to every live subscription. Never blocks.
    ///
    /// Returns the number of subscriptions that will see it. With none, the
    /// event is dropped.
    pub fn publish(&self, event: TransportEvent) -> usize {
        let kind = event.kind();
        let mut registry = lock(&self.registry);
        registry.subscribers.retain(|s| !s.sender.is_closed());

        let capacity = registry.capacity;
        let mut delivered = 0;
        for subscriber in &registry.subscribers {
            let backlog = subscriber.backlog.fetch_add(1, Ordering::Relaxed) + 1;
            if subscriber.sender.send(event.clone()).is_err() {
                subscriber.backlog.fetch_sub(1, Ordering::Relaxed);
                continue;
            }
            if backlog == capacity {
                tracing::warn!(backlog, kind, "event subscription lagging");
            }
            delivered += 1;
        }

        if delivered == 0 {
            tracing::trace!(kind, "no subscribers, event dropped");
        }
        delivered
    }
}

/// A screen's subscription.
///
/// Once unsubscribed it stays unsubscribed; there is no way back in.
#[derive(Debug)]
pub struct Subscription {
    receiver: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    backlog: Arc<AtomicUsize>,
}

impl Subscription {
    /// Receive the next event.
    ///
    /// Returns `None` after [`Subscription::unsubscribe`] or when every
    /// publisher is gone.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        let event = self.receiver.as_mut()?.recv().await?;
        self.backlog.fetch_sub(1, Ordering::Relaxed);
        Some(event)
    }

    /// Receive an event if one is ready, without waiting.
    pub fn try_recv(&mut self) -> Option<TransportEvent> {
        let event = self.receiver.as_mut()?.try_recv().ok()?;
        self.backlog.fetch_sub(1, Ordering::Relaxed);
        Some(event)
    }

    /// Events published to this subscription and not yet received.
    pub fn backlog(&self) -> usize {
        if self.receiver.is_some() { self.backlog.load(Ordering::Relaxed) } else { 0 }
    }

    /// Release the subscription. Pending and future events are dropped.
    ///
    /// Returns `true` only for the call that actually unsubscribed.
    pub fn unsubscribe(&mut self) -> bool {
        let released = self.receiver.take().is_some();
        if released {
            tracing::debug!("unsubscribed from transport events");
        }
        released
    }

    /// Whether events are still being received.
    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(text: &str) -> TransportEvent {
        TransportEvent::DataReceived { data: text.into() }
    }

    #[tokio::test]
    async fn events_arrive_in_order() {
        let channel = EventChannel::default();
        let mut subscription = channel.subscribe();
        let publisher = channel.publisher();

        assert_eq!(publisher.publish(data("a")), 1);
        assert_eq!(publisher.publish(TransportEvent::ModeState { code: 1 }), 1);

        assert_eq!(subscription.recv().await, Some(data("a")));
        assert_eq!(subscription.recv().await, Some(TransportEvent::ModeState { code: 1 }));
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent_and_final() {
        let channel = EventChannel::default();
        let mut subscription = channel.subscribe();
        let publisher = channel.publisher();
        let _ = publisher.publish(data("pending"));

        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        assert!(!subscription.is_active());
        assert_eq!(channel.subscriber_count(), 0);

        assert_eq!(publisher.publish(data("late")), 0);
        assert_eq!(subscription.recv().await, None);
        assert_eq!(subscription.try_recv(), None);
    }

    #[tokio::test]
    async fn closed_channel_ends_subscription() {
        let channel = EventChannel::default();
        let mut subscription = channel.subscribe();
        drop(channel);

        assert_eq!(subscription.recv().await, None);
    }

    #[test]
    fn slow_subscriber_loses_nothing() {
        let channel = EventChannel::new(2);
        let mut subscription = channel.subscribe();
        let publisher = channel.publisher();
        let _ = publisher.publish(TransportEvent::ModeState { code: 1 });
        let _ = publisher.publish(TransportEvent::ConnectionStatus { code: 0 });
        for text in ["1", "2", "3"] {
            let _ = publisher.publish(data(text));
        }
        assert_eq!(subscription.backlog(), 5);

        assert_eq!(subscription.try_recv(), Some(TransportEvent::ModeState { code: 1 }));
        assert_eq!(subscription.try_recv(), Some(TransportEvent::ConnectionStatus { code: 0 }));
        for text in ["1", "2", "3"] {
            assert_eq!(subscription.try_recv(), Some(data(text)));
        }
        assert_eq!(subscription.try_recv(), None);
        assert_eq!(subscription.backlog(), 0);
    }

    #[test]
    fn each_subscription_gets_every_event() {
        let channel = EventChannel::new(1);
        let mut first = channel.subscribe();
        let mut second = channel.subscribe();
        let publisher = channel.publisher();

        assert_eq!(publisher.publish(data("a")), 2);
        assert!(first.unsubscribe());
        assert_eq!(publisher.publish(data("b")), 1);
        assert_eq!(channel.subscriber_count(), 1);

        assert_eq!(second.try_recv(), Some(data("a")));
        assert_eq!(second.try_recv(), Some(data("b")));
        assert_eq!(first.try_recv(), None);
    }
}
