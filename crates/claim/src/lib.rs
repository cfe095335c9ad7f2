//! The flow-rate withdrawal claim pipeline.
//!
//! A withdrawal from the zkEVM is subject to a flow-rate delay; once the
//! delay elapses the funds must be claimed in a second transaction on L1.
//! [`WithdrawalClaimPipeline`] takes a claimable withdrawal through gas and
//! balance checks to a submitted L1 transaction, falling back to a
//! different wallet account when the active one cannot pay for gas.

pub mod gas;
mod pipeline;

pub use gas::{GasCheckResult, Sufficiency, FALLBACK_CLAIM_GAS_LIMIT};
pub use pipeline::{ClaimRun, WithdrawalClaimPipeline};

use thiserror::Error;
use wallet::{bridge::BridgeIndexError, ProviderError};

/// Hard failures of the claim pipeline. Advisory lookups (gas estimate,
/// fee data, balances) never produce these; they degrade in place.
#[derive(Error, Debug)]
pub enum ClaimError {
    /// The withdrawal record could not be fetched. Nothing else can
    /// proceed without it; the user re-enters the flow to retry.
    #[error("failed to fetch withdrawal record: {0}")]
    WithdrawalFetch(#[from] BridgeIndexError),

    /// The pipeline was started without a connected wallet.
    #[error("no active wallet provider")]
    NoActiveProvider,

    /// Could not create or connect the L1-capable signing wallet.
    #[error("failed to resolve a signing wallet: {0}")]
    SignerResolution(#[source] ProviderError),

    /// The wallet did not end up on the required L1 chain.
    #[error("failed to switch to chain {chain_id}: {source}")]
    NetworkSwitch {
        chain_id: u64,
        #[source]
        source: ProviderError,
    },

    /// The wallet or network rejected the claim transaction.
    #[error("claim submission failed: {0}")]
    Submission(#[source] ProviderError),
}
