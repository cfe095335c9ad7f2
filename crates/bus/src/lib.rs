//! Per-instance event delivery for checkout widgets.
//!
//! Each widget instance owns its own [`EventBus`], constructed at widget
//! creation. Nothing here is global: two instances on the same page cannot
//! observe each other's events, so listeners never need deduplication.

pub mod events;
pub mod navigator;

pub use events::{CheckoutEvent, ClaimFailureReason, ClaimOutcome};
pub use navigator::Navigator;

use std::sync::{Arc, Mutex, PoisonError, Weak};

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

impl<E> Registry<E> {
    const fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

/// A synchronous publish/subscribe surface.
///
/// Handlers run on the publishing thread, outside the registry lock, so a
/// handler may itself publish or subscribe without deadlocking.
pub struct EventBus<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// Register a handler. Delivery stops when the returned
    /// [`Subscription`] is dropped or explicitly unsubscribed.
    pub fn subscribe(&self, handler: impl Fn(&E) + Send + Sync + 'static) -> Subscription<E> {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every live subscriber, in subscription order.
    pub fn publish(&self, event: &E) {
        let handlers: Vec<Handler<E>> = {
            let registry = self
                .registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            registry
                .handlers
                .iter()
                .map(|(_, h)| Arc::clone(h))
                .collect()
        };

        for handler in handlers {
            handler(event);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .len()
    }
}

/// Handle tying a registered handler to its bus. Dropping it removes the
/// handler.
pub struct Subscription<E> {
    id: u64,
    registry: Weak<Mutex<Registry<E>>>,
}

impl<E> Subscription<E> {
    /// Explicitly remove the handler. Equivalent to dropping.
    pub fn unsubscribe(self) {}

    fn remove(&self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.handlers.retain(|(id, _)| *id != self.id);
        }
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn publish_reaches_subscribers() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_by_handler = Arc::clone(&seen);
        let _sub = bus.subscribe(move |event| {
            seen_by_handler.fetch_add(*event as usize, Ordering::SeqCst);
        });

        bus.publish(&3);
        bus.publish(&4);

        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_by_handler = Arc::clone(&seen);
        let sub = bus.subscribe(move |_| {
            seen_by_handler.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(&1);
        sub.unsubscribe();
        bus.publish(&1);

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn instances_are_isolated() {
        let a: EventBus<u32> = EventBus::new();
        let b: EventBus<u32> = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_by_handler = Arc::clone(&seen);
        let _sub = a.subscribe(move |_| {
            seen_by_handler.fetch_add(1, Ordering::SeqCst);
        });

        b.publish(&1);

        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handler_may_subscribe_during_publish() {
        let bus: EventBus<u32> = EventBus::new();

        let bus_in_handler = bus.clone();
        let _sub = bus.subscribe(move |_| {
            // Must not deadlock.
            let inner = bus_in_handler.subscribe(|_| {});
            inner.unsubscribe();
        });

        bus.publish(&1);
    }
}
