//! HTTP client for the bridge transactions-index service.

use alloy_primitives::Address;
use reqwest::StatusCode;
use wallet::bridge::{BridgeIndex, BridgeIndexError, WithdrawalClaim};

/// Client for the transactions-index endpoint that prepares unsigned
/// flow-rate claim transactions.
#[derive(Debug, Clone)]
pub struct BridgeIndexClient {
    client: reqwest::Client,
    base_url: String,
}

impl BridgeIndexClient {
    /// `base_url` is the index service root, e.g.
    /// `https://api.example.com/checkout`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a client with a custom HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn withdraw_tx_url(&self, recipient: Address, index: u64) -> String {
        format!(
            "{}/flowrate/withdrawals/{recipient}/{index}",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl BridgeIndex for BridgeIndexClient {
    async fn flow_rate_withdraw_tx(
        &self,
        recipient: Address,
        index: u64,
    ) -> Result<WithdrawalClaim, BridgeIndexError> {
        let url = self.withdraw_tx_url(recipient, index);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BridgeIndexError::Http(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BridgeIndexError::NotFound { recipient, index });
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(BridgeIndexError::Http(format!(
                "index returned {status}: {body}"
            )));
        }

        response
            .json::<WithdrawalClaim>()
            .await
            .map_err(|e| BridgeIndexError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn withdraw_tx_url_strips_trailing_slash() {
        let client = BridgeIndexClient::new("https://api.example.com/checkout/");
        let recipient = address!("5CFFA347b0aE99cc01E5c01714cA5658e54a23D1");
        let url = client.withdraw_tx_url(recipient, 3);
        assert_eq!(
            url,
            format!("https://api.example.com/checkout/flowrate/withdrawals/{recipient}/3")
        );
    }
}
