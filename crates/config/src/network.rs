//! Network configuration for checkout flows.
//!
//! Provides chain-specific parameters for the settlement chain (L1) and the
//! zkEVM scaling chain the bridge connects, for mainnet and testnet.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

/// Ethereum (L1) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthereumConfig {
    /// Chain ID
    pub chain_id: u64,
    /// Bridge contract the flow-rate claim transaction targets
    pub bridge: Address,
    /// Block time in seconds (12 for Ethereum mainnet)
    pub block_time_secs: u64,
}

impl EthereumConfig {
    /// Ethereum mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 1,
            bridge: address!("0xBa5E35E26Ae59c7aea6F029B68c6460De2d13eB6"),
            block_time_secs: 12,
        }
    }

    /// Ethereum Sepolia testnet configuration.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            bridge: address!("0x0D3C59c779Fd552C27b23F723E80246c840100F5"),
            block_time_secs: 12,
        }
    }
}

/// zkEVM (L2) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZkEvmConfig {
    /// Chain ID
    pub chain_id: u64,
    /// Block time in seconds
    pub block_time_secs: u64,
}

impl ZkEvmConfig {
    /// zkEVM mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 13371,
            block_time_secs: 2,
        }
    }

    /// zkEVM testnet configuration.
    pub const fn testnet() -> Self {
        Self {
            chain_id: 13473,
            block_time_secs: 2,
        }
    }
}

/// Complete network configuration for a checkout instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutNetworks {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Ethereum/L1 configuration
    pub ethereum: EthereumConfig,
    /// zkEVM/L2 configuration
    pub zkevm: ZkEvmConfig,
}

impl CheckoutNetworks {
    /// Create mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            ethereum: EthereumConfig::mainnet(),
            zkevm: ZkEvmConfig::mainnet(),
        }
    }

    /// Create testnet (Sepolia + zkEVM testnet) configuration.
    pub const fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            ethereum: EthereumConfig::sepolia(),
            zkevm: ZkEvmConfig::testnet(),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::testnet(),
        }
    }

    /// The chains a connected wallet is allowed to be on.
    pub const fn allowed_chain_ids(&self) -> [u64; 2] {
        [self.ethereum.chain_id, self.zkevm.chain_id]
    }

    /// Whether `chain_id` is in the allow-list.
    pub fn is_allowed(&self, chain_id: u64) -> bool {
        self.allowed_chain_ids().contains(&chain_id)
    }

    /// The settlement chain the claim transaction must be submitted on.
    pub const fn l1_chain_id(&self) -> u64 {
        self.ethereum.chain_id
    }

    pub const fn l2_chain_id(&self) -> u64 {
        self.zkevm.chain_id
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct CheckoutNetworksBuilder {
    network_type: NetworkType,
    ethereum: EthereumConfig,
    zkevm: ZkEvmConfig,
}

impl CheckoutNetworksBuilder {
    /// Start with mainnet defaults.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            ethereum: EthereumConfig::mainnet(),
            zkevm: ZkEvmConfig::mainnet(),
        }
    }

    /// Start with testnet defaults.
    pub const fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            ethereum: EthereumConfig::sepolia(),
            zkevm: ZkEvmConfig::testnet(),
        }
    }

    /// Override the L1 bridge contract address.
    pub const fn ethereum_bridge(mut self, address: Address) -> Self {
        self.ethereum.bridge = address;
        self
    }

    /// Override the L1 chain ID (local devnets).
    pub const fn ethereum_chain_id(mut self, chain_id: u64) -> Self {
        self.ethereum.chain_id = chain_id;
        self
    }

    /// Override the L2 chain ID (local devnets).
    pub const fn zkevm_chain_id(mut self, chain_id: u64) -> Self {
        self.zkevm.chain_id = chain_id;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> CheckoutNetworks {
        CheckoutNetworks {
            network_type: self.network_type,
            ethereum: self.ethereum,
            zkevm: self.zkevm,
        }
    }
}
