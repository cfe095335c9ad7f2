use config::NetworkType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level checkout harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// L1 RPC endpoint url
    pub l1_rpc_url: String,

    /// L2 (zkEVM) RPC endpoint url
    pub l2_rpc_url: String,

    /// Base URL of the bridge transactions-index service
    pub bridge_api_url: String,

    /// Which network pair to run against
    pub network: NetworkType,

    /// Prometheus exporter port; exporter disabled when absent
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// The signing key never lives in the config file.
    pub fn private_key() -> eyre::Result<String> {
        std::env::var("PRIVATE_KEY")
            .map_err(|_| eyre::eyre!("PRIVATE_KEY environment variable is not set"))
    }
}
