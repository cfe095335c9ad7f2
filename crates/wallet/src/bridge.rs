//! Bridge transactions-index capability.
//!
//! Flow-rate withdrawals are claimed in a second L1 transaction. The
//! transactions-index service knows which withdrawals are claimable and
//! prepares the unsigned claim transaction for each one.

use alloy_primitives::Address;
use alloy_rpc_types::TransactionRequest;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// A claimable flow-rate withdrawal as reported by the transactions index.
///
/// Immutable once fetched for a given claim attempt; retries re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalClaim {
    /// Address the withdrawn funds are released to.
    pub recipient: Address,
    /// Position of this withdrawal in the recipient's pending queue.
    pub index: u64,
    /// Whether the flow-rate delay has elapsed.
    pub can_withdraw: bool,
    /// The prepared unsigned L1 claim transaction.
    pub unsigned_transaction: TransactionRequest,
    /// Unix timestamp at which the delay elapses. Informational only.
    pub timeout_end: u64,
}

/// Errors from the transactions-index service.
#[derive(Error, Debug)]
pub enum BridgeIndexError {
    #[error("no pending withdrawal for {recipient} at index {index}")]
    NotFound { recipient: Address, index: u64 },

    #[error("transactions index request failed: {0}")]
    Http(String),

    #[error("transactions index returned an invalid response: {0}")]
    Decode(String),
}

/// Capability for querying the bridge transactions index.
pub trait BridgeIndex: Send + Sync {
    /// Fetch the unsigned claim transaction for a pending withdrawal.
    fn flow_rate_withdraw_tx(
        &self,
        recipient: Address,
        index: u64,
    ) -> impl Future<Output = Result<WithdrawalClaim, BridgeIndexError>> + Send;
}
