//! Navigation state for checkout widgets.
//!
//! Every widget drives its screens through a [`ViewStack`]: a linear history
//! of views whose transitions are pure functions over the previous state.
//! Invalid transitions are defined as no-ops rather than errors, so
//! navigation can never fail in the middle of a render cycle.

pub mod bridge;

use std::fmt::Debug;

/// A view that can live on a [`ViewStack`].
///
/// Implementors are closed per-widget enumerations: the payload shape of
/// each screen is fixed by its variant, and [`View::Kind`] is the
/// payload-free tag used for identity checks and targeted back-navigation.
pub trait View: Clone {
    /// Payload-free tag identifying the screen.
    type Kind: Copy + Eq + Debug;

    /// Data a view can stash on itself when the user navigates away,
    /// to be restored if the user returns via [`Transition::GoBack`].
    type Stash: Clone + Debug;

    /// The tag for this view.
    fn kind(&self) -> Self::Kind;

    /// Merge stashed data into this view. Variants without a stashable
    /// payload ignore the data.
    fn absorb(&mut self, stash: Self::Stash);
}

/// A navigation transition.
#[derive(Debug, Clone)]
pub enum Transition<V: View> {
    /// Show `view`. If its kind equals the current head, the head is
    /// replaced in place instead of growing the history. `stash` is merged
    /// into the view being left, not the incoming one.
    Update { view: V, stash: Option<V::Stash> },
    /// Pop one entry. No-op at the root.
    GoBack,
    /// Truncate history to the first (earliest) occurrence of `kind`.
    /// No-op if `kind` is absent.
    GoBackTo(V::Kind),
}

impl<V: View> Transition<V> {
    /// Navigate to `view` without stashing anything on the outgoing view.
    pub const fn update(view: V) -> Self {
        Self::Update { view, stash: None }
    }

    /// Navigate to `view`, stashing `stash` on the view being left.
    pub const fn update_with_stash(view: V, stash: V::Stash) -> Self {
        Self::Update {
            view,
            stash: Some(stash),
        }
    }
}

/// Linear navigation history for one widget instance.
///
/// The currently shown view is stored separately from the entries behind
/// it, so the history is non-empty by construction and the head is always
/// the last logical entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewStack<V: View> {
    previous: Vec<V>,
    current: V,
}

impl<V: View> ViewStack<V> {
    /// Create a stack showing `initial` with no history behind it.
    pub const fn new(initial: V) -> Self {
        Self {
            previous: Vec::new(),
            current: initial,
        }
    }

    /// The currently shown view.
    pub const fn current(&self) -> &V {
        &self.current
    }

    /// Total number of history entries, head included.
    pub fn depth(&self) -> usize {
        self.previous.len() + 1
    }

    /// All entries from oldest to the current head.
    pub fn history(&self) -> impl Iterator<Item = &V> {
        self.previous.iter().chain(std::iter::once(&self.current))
    }

    /// Apply a transition, returning the next state. Pure: `self` is left
    /// untouched and no transition can fail.
    pub fn apply(&self, transition: Transition<V>) -> Self {
        let mut next = self.clone();

        match transition {
            Transition::Update { view, stash } => {
                if next.current.kind() == view.kind() {
                    // Re-rendering the same screen replaces the head in
                    // place; the history must not grow.
                    next.current = view;
                } else {
                    let mut leaving = next.current;
                    if let Some(stash) = stash {
                        leaving.absorb(stash);
                    }
                    next.previous.push(leaving);
                    next.current = view;
                }
            }
            Transition::GoBack => {
                if let Some(view) = next.previous.pop() {
                    next.current = view;
                }
            }
            Transition::GoBackTo(kind) => {
                if let Some(idx) = next.previous.iter().position(|v| v.kind() == kind) {
                    // Earliest occurrence wins; everything after it is
                    // discarded. If the only occurrence is the head itself
                    // there is nothing to discard.
                    next.current = next.previous[idx].clone();
                    next.previous.truncate(idx);
                }
            }
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{BridgeFormStash, BridgeView, BridgeViewKind};
    use alloy_primitives::{Address, U256};

    fn form() -> BridgeView {
        BridgeView::BridgeForm {
            stash: BridgeFormStash::default(),
        }
    }

    #[test]
    fn update_pushes_new_view() {
        let stack = ViewStack::new(BridgeView::Loading);
        let stack = stack.apply(Transition::update(form()));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current().kind(), BridgeViewKind::BridgeForm);
    }

    #[test]
    fn update_same_kind_replaces_in_place() {
        let stack = ViewStack::new(BridgeView::Loading);
        let stack = stack.apply(Transition::update(form()));
        let stack = stack.apply(Transition::update(form()));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current().kind(), BridgeViewKind::BridgeForm);
    }

    #[test]
    fn update_stashes_on_outgoing_view() {
        let stack = ViewStack::new(form());
        let stash = BridgeFormStash {
            amount: Some(U256::from(42)),
            token_address: Some(Address::repeat_byte(1)),
            recipient: None,
        };

        let stack = stack.apply(Transition::update_with_stash(
            BridgeView::WalletNetworkSelection,
            stash.clone(),
        ));

        assert_eq!(stack.depth(), 2);
        let entries: Vec<_> = stack.history().collect();
        assert_eq!(entries[0], &BridgeView::BridgeForm { stash });
        assert_eq!(entries[1].kind(), BridgeViewKind::WalletNetworkSelection);

        // Going back restores the stashed form.
        let stack = stack.apply(Transition::GoBack);
        match stack.current() {
            BridgeView::BridgeForm { stash } => {
                assert_eq!(stash.amount, Some(U256::from(42)));
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn go_back_is_noop_at_root() {
        let stack = ViewStack::new(BridgeView::Loading);
        let after = stack.apply(Transition::GoBack);

        assert_eq!(after, stack);
    }

    #[test]
    fn go_back_to_truncates_to_first_occurrence() {
        // History: form, selection, form, review. Going back to the form
        // must land on the earliest entry, not the later duplicate.
        let stack = ViewStack::new(form())
            .apply(Transition::update(BridgeView::WalletNetworkSelection))
            .apply(Transition::update(form()))
            .apply(Transition::update(BridgeView::BridgeReview {
                amount: U256::from(1),
                token_address: Address::ZERO,
                recipient: Address::ZERO,
            }));
        assert_eq!(stack.depth(), 4);

        let stack = stack.apply(Transition::GoBackTo(BridgeViewKind::BridgeForm));

        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current().kind(), BridgeViewKind::BridgeForm);
    }

    #[test]
    fn go_back_to_absent_kind_is_noop() {
        let stack = ViewStack::new(form())
            .apply(Transition::update(BridgeView::WalletNetworkSelection));

        let after = stack.apply(Transition::GoBackTo(BridgeViewKind::ClaimError));

        assert_eq!(after, stack);
    }

    #[test]
    fn go_back_to_current_head_is_noop() {
        // The head is the first (and only) occurrence, so there is nothing
        // after it to discard.
        let stack = ViewStack::new(form())
            .apply(Transition::update(BridgeView::WalletNetworkSelection));

        let after = stack.apply(Transition::GoBackTo(
            BridgeViewKind::WalletNetworkSelection,
        ));

        assert_eq!(after, stack);
    }
}
