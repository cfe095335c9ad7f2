//! Headless RPC-backed wallet gateway.
//!
//! Implements the wallet capability surface against plain JSON-RPC
//! endpoints with a local signing key. There is no wallet UI here: connect
//! prompts succeed unconditionally and "switching networks" means pointing
//! at a different configured endpoint. Used by the CLI harness and by
//! anything else that drives the checkout flows without a browser wallet.

mod bridge_index;

pub use bridge_index::BridgeIndexClient;

use alloy_network::EthereumWallet;
use alloy_primitives::{Address, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::{BlockNumberOrTag, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;
use wallet::{
    ConnectOptions, FeeData, NetworkInfo, ProviderError, SubmittedTransaction, TokenBalance,
    WalletGateway, WalletProviderKind,
};

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// General error with context
    #[error("Client error: {0}")]
    Other(String),
}

/// Opaque provider handle the gateway hands out: a signing RPC provider
/// plus the connection bit the flows query.
#[derive(Clone)]
pub struct RpcProvider {
    inner: DynProvider,
    connected: bool,
}

/// [`WalletGateway`] over configured JSON-RPC endpoints, signing with a
/// single local key. Stands in for the injected browser wallet; the
/// embedded and WalletConnect kinds have no headless equivalent.
#[derive(Clone)]
pub struct RpcWalletGateway {
    endpoints: HashMap<u64, String>,
    wallet: EthereumWallet,
    address: Address,
    default_chain_id: u64,
}

impl RpcWalletGateway {
    /// `endpoints` maps each supported chain id to its RPC URL. The
    /// default chain is where freshly created providers point.
    pub fn new(
        private_key: &str,
        default_chain_id: u64,
        endpoints: impl IntoIterator<Item = (u64, String)>,
    ) -> Result<Self, ClientError> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| ClientError::InvalidPrivateKey(format!("{e}")))?;
        let address = signer.address();
        let endpoints: HashMap<u64, String> = endpoints.into_iter().collect();
        if !endpoints.contains_key(&default_chain_id) {
            return Err(ClientError::Other(format!(
                "no RPC endpoint configured for default chain {default_chain_id}"
            )));
        }

        Ok(Self {
            endpoints,
            wallet: EthereumWallet::from(signer),
            address,
            default_chain_id,
        })
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    fn build_provider(&self, chain_id: u64, connected: bool) -> Result<RpcProvider, ProviderError> {
        let rpc_url = self
            .endpoints
            .get(&chain_id)
            .ok_or_else(|| ProviderError::Rpc(format!("no RPC endpoint for chain {chain_id}")))?;
        let url = rpc_url
            .parse()
            .map_err(|e| ProviderError::Rpc(format!("invalid RPC URL: {e}")))?;
        let inner = ProviderBuilder::new()
            .wallet(self.wallet.clone())
            .connect_http(url)
            .erased();

        Ok(RpcProvider { inner, connected })
    }

    /// Fill missing transaction fields using the provider.
    async fn fill_transaction(
        &self,
        provider: &DynProvider,
        mut tx: TransactionRequest,
    ) -> Result<TransactionRequest, ProviderError> {
        if tx.from.is_none() {
            tx.from = Some(self.address);
        }

        if tx.chain_id.is_none() {
            let chain_id = provider.get_chain_id().await.map_err(rpc_err)?;
            tx.chain_id = Some(chain_id);
        }

        if tx.nonce.is_none() {
            let nonce = provider
                .get_transaction_count(self.address)
                .await
                .map_err(rpc_err)?;
            tx.nonce = Some(nonce);
        }

        // Fee parameters before gas estimation, since estimation may need
        // fee info.
        if tx.max_fee_per_gas.is_none() || tx.max_priority_fee_per_gas.is_none() {
            let fee_estimate = provider.estimate_eip1559_fees().await.map_err(rpc_err)?;
            if tx.max_fee_per_gas.is_none() {
                tx.max_fee_per_gas = Some(fee_estimate.max_fee_per_gas);
            }
            if tx.max_priority_fee_per_gas.is_none() {
                tx.max_priority_fee_per_gas = Some(fee_estimate.max_priority_fee_per_gas);
            }
        }

        if tx.gas.is_none() {
            let gas_estimate = provider.estimate_gas(tx.clone()).await.map_err(rpc_err)?;
            // 20% buffer
            tx.gas = Some(gas_estimate + gas_estimate / 5);
        }

        Ok(tx)
    }
}

impl WalletGateway for RpcWalletGateway {
    type Provider = RpcProvider;

    async fn create_provider(
        &self,
        kind: WalletProviderKind,
    ) -> Result<Self::Provider, ProviderError> {
        if kind != WalletProviderKind::Injected {
            return Err(ProviderError::NoDefaultProvider(kind));
        }
        self.build_provider(self.default_chain_id, false)
    }

    async fn is_wallet_connected(&self, provider: &Self::Provider) -> Result<bool, ProviderError> {
        Ok(provider.connected)
    }

    async fn connect(
        &self,
        provider: &Self::Provider,
        options: ConnectOptions,
    ) -> Result<Self::Provider, ProviderError> {
        if options.request_wallet_permissions {
            // A local key has exactly one account; the picker is a no-op.
            debug!(address = %self.address, "account picker requested on single-key gateway");
        }
        Ok(RpcProvider {
            inner: provider.inner.clone(),
            connected: true,
        })
    }

    async fn network_info(&self, provider: &Self::Provider) -> Result<NetworkInfo, ProviderError> {
        let chain_id = provider.inner.get_chain_id().await.map_err(rpc_err)?;
        Ok(NetworkInfo {
            chain_id,
            is_supported: self.endpoints.contains_key(&chain_id),
        })
    }

    async fn switch_network(
        &self,
        provider: &Self::Provider,
        chain_id: u64,
    ) -> Result<Self::Provider, ProviderError> {
        self.build_provider(chain_id, provider.connected)
    }

    async fn estimate_gas(
        &self,
        provider: &Self::Provider,
        tx: &TransactionRequest,
    ) -> Result<U256, ProviderError> {
        let mut tx = tx.clone();
        if tx.from.is_none() {
            tx.from = Some(self.address);
        }
        let units = provider.inner.estimate_gas(tx).await.map_err(rpc_err)?;
        Ok(U256::from(units))
    }

    async fn fee_data(&self, provider: &Self::Provider) -> Result<FeeData, ProviderError> {
        let block = provider
            .inner
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(rpc_err)?;
        let last_base_fee_per_gas = block
            .and_then(|block| block.header.base_fee_per_gas)
            .map(U256::from);

        // Not every endpoint serves eth_maxPriorityFeePerGas; callers treat
        // a partial report as degraded, not failed.
        let max_priority_fee_per_gas = provider
            .inner
            .get_max_priority_fee_per_gas()
            .await
            .ok()
            .map(U256::from);

        let gas_price = provider.inner.get_gas_price().await.ok().map(U256::from);

        Ok(FeeData {
            last_base_fee_per_gas,
            max_priority_fee_per_gas,
            gas_price,
        })
    }

    async fn balances(
        &self,
        provider: &Self::Provider,
        chain_id: u64,
    ) -> Result<Vec<TokenBalance>, ProviderError> {
        // Only the native token is tracked headlessly; ERC-20 discovery
        // belongs to the wallet UI.
        let _ = chain_id;
        let amount_wei = provider
            .inner
            .get_balance(self.address)
            .await
            .map_err(rpc_err)?;
        Ok(vec![TokenBalance {
            token_address: Address::ZERO,
            amount_wei,
        }])
    }

    async fn send_transaction(
        &self,
        provider: &Self::Provider,
        tx: TransactionRequest,
    ) -> Result<SubmittedTransaction, ProviderError> {
        let filled = self.fill_transaction(&provider.inner, tx).await?;
        let chain_id = match filled.chain_id {
            Some(chain_id) => chain_id,
            None => provider.inner.get_chain_id().await.map_err(rpc_err)?,
        };
        let pending = provider
            .inner
            .send_transaction(filled)
            .await
            .map_err(rpc_err)?;

        Ok(SubmittedTransaction {
            tx_hash: *pending.tx_hash(),
            chain_id,
        })
    }

    async fn identify(&self, provider: &Self::Provider) -> Result<(), ProviderError> {
        let _ = provider;
        debug!(address = %self.address, "identified local signing account");
        Ok(())
    }
}

fn rpc_err(err: impl std::fmt::Display) -> ProviderError {
    ProviderError::Rpc(err.to_string())
}
