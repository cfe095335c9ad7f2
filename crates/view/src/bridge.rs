//! Views for the bridge widget: the bridge form, review screen, and the
//! flow-rate withdrawal claim screens.

use crate::View;
use alloy_primitives::{Address, TxHash, U256};

/// Screen tags for the bridge widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeViewKind {
    Loading,
    WalletNetworkSelection,
    BridgeForm,
    BridgeReview,
    SwitchNetwork,
    ClaimWithdrawal,
    ClaimInProgress,
    InsufficientNativeGas,
    ClaimError,
    Error,
}

/// Form fields the bridge form stashes on itself before the user navigates
/// away, restored on the way back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeFormStash {
    pub amount: Option<U256>,
    pub token_address: Option<Address>,
    pub recipient: Option<Address>,
}

impl BridgeFormStash {
    /// Overlay `other` onto `self`: fields present in `other` win, fields
    /// absent in `other` keep their existing value.
    fn merge(&mut self, other: Self) {
        if other.amount.is_some() {
            self.amount = other.amount;
        }
        if other.token_address.is_some() {
            self.token_address = other.token_address;
        }
        if other.recipient.is_some() {
            self.recipient = other.recipient;
        }
    }
}

/// The bridge widget's closed view enumeration. Each variant's payload is
/// exactly what that screen renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeView {
    /// Initial view while connection bootstrapping runs.
    Loading,
    /// Wallet and network selection screen.
    WalletNetworkSelection,
    /// The main bridge form, with any previously stashed inputs.
    BridgeForm { stash: BridgeFormStash },
    /// Review screen before submitting a bridge transfer.
    BridgeReview {
        amount: U256,
        token_address: Address,
        recipient: Address,
    },
    /// Prompt to switch the wallet to a supported network.
    SwitchNetwork { required_chain_id: u64 },
    /// A flow-rate withdrawal ready (or waiting) to be claimed.
    ClaimWithdrawal {
        recipient: Address,
        index: u64,
        /// Unix timestamp at which the flow-rate delay elapses. Display
        /// only; the pipeline never polls or cancels on it.
        timeout_end: u64,
    },
    /// Claim submitted; carries the transaction hash for confirmation
    /// polling downstream.
    ClaimInProgress { tx_hash: TxHash },
    /// The active account cannot cover L1 gas for the claim. Recoverable:
    /// the user may retry with a different account.
    InsufficientNativeGas {
        balance_wei: Option<U256>,
        required_wei: U256,
    },
    /// Terminal claim failure.
    ClaimError { message: String },
    /// Terminal widget failure.
    Error { message: String },
}

impl View for BridgeView {
    type Kind = BridgeViewKind;
    type Stash = BridgeFormStash;

    fn kind(&self) -> BridgeViewKind {
        match self {
            Self::Loading => BridgeViewKind::Loading,
            Self::WalletNetworkSelection => BridgeViewKind::WalletNetworkSelection,
            Self::BridgeForm { .. } => BridgeViewKind::BridgeForm,
            Self::BridgeReview { .. } => BridgeViewKind::BridgeReview,
            Self::SwitchNetwork { .. } => BridgeViewKind::SwitchNetwork,
            Self::ClaimWithdrawal { .. } => BridgeViewKind::ClaimWithdrawal,
            Self::ClaimInProgress { .. } => BridgeViewKind::ClaimInProgress,
            Self::InsufficientNativeGas { .. } => BridgeViewKind::InsufficientNativeGas,
            Self::ClaimError { .. } => BridgeViewKind::ClaimError,
            Self::Error { .. } => BridgeViewKind::Error,
        }
    }

    fn absorb(&mut self, stash: BridgeFormStash) {
        // Only the form carries user input worth preserving.
        if let Self::BridgeForm { stash: existing } = self {
            existing.merge(stash);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stash_merge_keeps_unset_fields() {
        let mut view = BridgeView::BridgeForm {
            stash: BridgeFormStash {
                amount: Some(U256::from(5)),
                token_address: None,
                recipient: Some(Address::repeat_byte(9)),
            },
        };

        view.absorb(BridgeFormStash {
            amount: Some(U256::from(7)),
            token_address: Some(Address::repeat_byte(2)),
            recipient: None,
        });

        match view {
            BridgeView::BridgeForm { stash } => {
                assert_eq!(stash.amount, Some(U256::from(7)));
                assert_eq!(stash.token_address, Some(Address::repeat_byte(2)));
                assert_eq!(stash.recipient, Some(Address::repeat_byte(9)));
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn absorb_ignored_on_non_form_views() {
        let mut view = BridgeView::Loading;
        view.absorb(BridgeFormStash {
            amount: Some(U256::from(1)),
            ..Default::default()
        });
        assert_eq!(view, BridgeView::Loading);
    }
}
