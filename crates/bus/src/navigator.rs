//! Dispatch point between the async orchestrators and the pure view
//! reducer.
//!
//! Orchestrators decide *what* changed; the [`Navigator`] applies the pure
//! transition and tells the outside world. This keeps every async component
//! free of navigation bookkeeping and keeps the reducer trivially testable.

use crate::{CheckoutEvent, ClaimOutcome, EventBus};
use std::sync::{Mutex, PoisonError};
use tracing::debug;
use view::{bridge::BridgeView, Transition, View, ViewStack};

/// Owns the view stack for one widget instance and publishes changes.
pub struct Navigator {
    stack: Mutex<ViewStack<BridgeView>>,
    bus: EventBus<CheckoutEvent>,
}

impl Navigator {
    /// Create a navigator showing `initial`, with a fresh bus.
    pub fn new(initial: BridgeView) -> Self {
        Self::with_bus(initial, EventBus::new())
    }

    /// Create a navigator publishing on an existing bus.
    pub fn with_bus(initial: BridgeView, bus: EventBus<CheckoutEvent>) -> Self {
        Self {
            stack: Mutex::new(ViewStack::new(initial)),
            bus,
        }
    }

    pub const fn bus(&self) -> &EventBus<CheckoutEvent> {
        &self.bus
    }

    /// Apply a transition and publish [`CheckoutEvent::ViewChanged`] if the
    /// head view changed.
    pub fn dispatch(&self, transition: Transition<BridgeView>) {
        let changed = {
            let mut stack = self.stack.lock().unwrap_or_else(PoisonError::into_inner);
            let next = stack.apply(transition);
            let changed = next.current() != stack.current();
            *stack = next;
            changed.then(|| stack.current().clone())
        };

        if let Some(view) = changed {
            debug!(kind = ?view.kind(), "navigation head changed");
            self.bus.publish(&CheckoutEvent::ViewChanged { view });
        }
    }

    /// Publish the terminal outcome of a claim run.
    pub fn publish_claim_outcome(&self, outcome: ClaimOutcome) {
        self.bus.publish(&CheckoutEvent::ClaimOutcome { outcome });
    }

    /// The currently shown view.
    pub fn current(&self) -> BridgeView {
        self.stack
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
            .clone()
    }

    /// A copy of the full stack, for the widget layer and tests.
    pub fn snapshot(&self) -> ViewStack<BridgeView> {
        self.stack
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use view::bridge::BridgeViewKind;

    #[test]
    fn dispatch_publishes_view_changes() {
        let navigator = Navigator::new(BridgeView::Loading);
        let changes = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&changes);
        let _sub = navigator.bus().subscribe(move |event| {
            if matches!(event, CheckoutEvent::ViewChanged { .. }) {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        navigator.dispatch(Transition::update(BridgeView::WalletNetworkSelection));
        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(
            navigator.current().kind(),
            BridgeViewKind::WalletNetworkSelection
        );

        // Identical head: reducer replaces in place, nothing to announce.
        navigator.dispatch(Transition::update(BridgeView::WalletNetworkSelection));
        assert_eq!(changes.load(Ordering::SeqCst), 1);

        navigator.dispatch(Transition::GoBack);
        assert_eq!(changes.load(Ordering::SeqCst), 2);
        assert_eq!(navigator.current().kind(), BridgeViewKind::Loading);

        // No-op at the root: nothing published.
        navigator.dispatch(Transition::GoBack);
        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }
}
