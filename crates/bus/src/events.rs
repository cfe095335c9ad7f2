//! Events the orchestration core exposes to the widget layer.

use alloy_primitives::TxHash;
use view::bridge::BridgeView;

/// Events published on a checkout instance's bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    /// The navigation head changed; the widget layer re-renders from the
    /// carried view.
    ViewChanged { view: BridgeView },
    /// Terminal outcome of a withdrawal claim run.
    ClaimOutcome { outcome: ClaimOutcome },
}

/// How a withdrawal claim run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The claim transaction was accepted by the wallet and broadcast.
    Submitted { tx_hash: TxHash },
    /// The active account cannot pay L1 gas. Recoverable by retrying with
    /// a different account.
    InsufficientNativeGas,
    /// The run failed terminally.
    Failed { reason: ClaimFailureReason },
}

/// Reason codes for terminal claim failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimFailureReason {
    /// The withdrawal record could not be fetched. The flow can simply be
    /// re-entered; no view changes.
    WithdrawalFetch,
    /// Could not create or connect the signing wallet.
    SignerResolution,
    /// The wallet refused or failed to switch to the required chain.
    NetworkSwitch,
    /// The wallet or network rejected the claim transaction.
    Submission,
    /// The user declined a wallet prompt.
    RejectedByUser,
}
