//! Wallet capability contracts for the checkout orchestration core.
//!
//! The core never talks to a wallet SDK or RPC endpoint directly; it is
//! written against the [`WalletGateway`] trait and the bridge index trait in
//! [`bridge`]. Concrete implementations (a browser wallet binding, the
//! headless RPC client) live outside this crate.

pub mod bridge;
pub mod slot;

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use serde::{Deserialize, Serialize};
use std::{fmt, future::Future};
use thiserror::Error;

/// The kinds of wallet provider a checkout instance can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletProviderKind {
    /// Browser-injected, general-purpose wallet (MetaMask-equivalent).
    /// Can sign transactions on any supported chain.
    Injected,
    /// The product's embedded wallet. Restricted: cannot sign L1
    /// transactions, so L1 claims must switch to an injected wallet.
    Embedded,
    /// WalletConnect session.
    WalletConnect,
}

impl WalletProviderKind {
    /// Whether this wallet kind can sign L1 transactions.
    pub const fn can_sign_l1(self) -> bool {
        !matches!(self, Self::Embedded)
    }
}

impl fmt::Display for WalletProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Injected => "injected",
            Self::Embedded => "embedded",
            Self::WalletConnect => "walletconnect",
        };
        f.write_str(name)
    }
}

/// Options for a connect request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectOptions {
    /// Force the wallet to show its account picker instead of silently
    /// reusing the current account.
    pub request_wallet_permissions: bool,
}

/// Result of a network query against a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    pub chain_id: u64,
    /// Whether the wallet itself reports the network as supported.
    pub is_supported: bool,
}

/// Fee data as reported by the provider. Every field is optional: a
/// provider may only know a subset, and callers degrade gracefully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeData {
    pub last_base_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub gas_price: Option<U256>,
}

impl FeeData {
    /// The gas price to budget with: `base + priority` when both are known,
    /// otherwise the legacy gas price, otherwise nothing.
    pub fn effective_gas_price(&self) -> Option<U256> {
        match (self.last_base_fee_per_gas, self.max_priority_fee_per_gas) {
            (Some(base), Some(priority)) => Some(base + priority),
            _ => self.gas_price,
        }
    }
}

/// A token balance held by the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Token contract address; [`Address::ZERO`] for the native token.
    pub token_address: Address,
    pub amount_wei: U256,
}

impl TokenBalance {
    pub fn is_native(&self) -> bool {
        self.token_address.is_zero()
    }
}

/// A transaction accepted by the wallet and broadcast to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub tx_hash: TxHash,
    pub chain_id: u64,
}

/// Errors surfaced by wallet capabilities.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No default provider object exists for the requested wallet kind
    /// (e.g. the extension is not installed).
    #[error("no default provider available for {0} wallet")]
    NoDefaultProvider(WalletProviderKind),

    /// The user declined a wallet prompt. Mapped to a retry affordance,
    /// never to a failure screen.
    #[error("request rejected by user")]
    Rejected,

    /// The provider or RPC endpoint failed.
    #[error("provider error: {0}")]
    Rpc(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// The wallet capability surface the orchestration core is written against.
///
/// Every method is an async suspension point; between calls the core's
/// state transitions are synchronous. `Provider` is an opaque handle the
/// implementation hands back from `create_provider`/`connect` and expects
/// on every subsequent call.
pub trait WalletGateway: Send + Sync {
    type Provider: Clone + Send + Sync;

    /// Create a provider handle for a wallet kind without connecting it.
    fn create_provider(
        &self,
        kind: WalletProviderKind,
    ) -> impl Future<Output = Result<Self::Provider, ProviderError>> + Send;

    /// Whether the provider already has a connected account.
    fn is_wallet_connected(
        &self,
        provider: &Self::Provider,
    ) -> impl Future<Output = Result<bool, ProviderError>> + Send;

    /// Request a connection, possibly returning a fresh handle.
    fn connect(
        &self,
        provider: &Self::Provider,
        options: ConnectOptions,
    ) -> impl Future<Output = Result<Self::Provider, ProviderError>> + Send;

    /// Query the provider's current network.
    fn network_info(
        &self,
        provider: &Self::Provider,
    ) -> impl Future<Output = Result<NetworkInfo, ProviderError>> + Send;

    /// Ask the wallet to switch chains, returning the (possibly new)
    /// handle to use afterwards.
    fn switch_network(
        &self,
        provider: &Self::Provider,
        chain_id: u64,
    ) -> impl Future<Output = Result<Self::Provider, ProviderError>> + Send;

    /// Estimate gas units for an unsigned transaction.
    fn estimate_gas(
        &self,
        provider: &Self::Provider,
        tx: &TransactionRequest,
    ) -> impl Future<Output = Result<U256, ProviderError>> + Send;

    /// Current fee data.
    fn fee_data(
        &self,
        provider: &Self::Provider,
    ) -> impl Future<Output = Result<FeeData, ProviderError>> + Send;

    /// All token balances for the connected account on `chain_id`.
    fn balances(
        &self,
        provider: &Self::Provider,
        chain_id: u64,
    ) -> impl Future<Output = Result<Vec<TokenBalance>, ProviderError>> + Send;

    /// Sign and broadcast an unsigned transaction.
    fn send_transaction(
        &self,
        provider: &Self::Provider,
        tx: TransactionRequest,
    ) -> impl Future<Output = Result<SubmittedTransaction, ProviderError>> + Send;

    /// Best-effort user identification. Callers swallow failures.
    fn identify(
        &self,
        provider: &Self::Provider,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_gas_price_prefers_eip1559_components() {
        let fees = FeeData {
            last_base_fee_per_gas: Some(U256::from(30)),
            max_priority_fee_per_gas: Some(U256::from(2)),
            gas_price: Some(U256::from(99)),
        };
        assert_eq!(fees.effective_gas_price(), Some(U256::from(32)));
    }

    #[test]
    fn effective_gas_price_falls_back_to_legacy() {
        let fees = FeeData {
            last_base_fee_per_gas: Some(U256::from(30)),
            max_priority_fee_per_gas: None,
            gas_price: Some(U256::from(40)),
        };
        assert_eq!(fees.effective_gas_price(), Some(U256::from(40)));
    }

    #[test]
    fn effective_gas_price_unknown_when_nothing_reported() {
        assert_eq!(FeeData::default().effective_gas_price(), None);
    }

    #[test]
    fn embedded_wallet_cannot_sign_l1() {
        assert!(!WalletProviderKind::Embedded.can_sign_l1());
        assert!(WalletProviderKind::Injected.can_sign_l1());
        assert!(WalletProviderKind::WalletConnect.can_sign_l1());
    }
}
