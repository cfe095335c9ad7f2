//! Configuration types for checkout orchestration.
//!
//! This crate provides:
//! - Network configurations (mainnet, testnet) and the chain allow-list
//! - The retry policy value object shared by polling call sites

pub mod network;
pub mod retry;

pub use network::{
    CheckoutNetworks, CheckoutNetworksBuilder, EthereumConfig, NetworkType, ZkEvmConfig,
};
pub use retry::RetryPolicy;
