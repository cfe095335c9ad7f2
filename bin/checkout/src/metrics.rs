//! Prometheus metrics for the checkout harness.
//!
//! All metrics are aggregated in the [`Metrics`] struct for easy tracking and management.

use bus::{ClaimFailureReason, ClaimOutcome};
use connection::ConnectionStatus;
use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Aggregated metrics for the checkout flows.
///
/// Metrics are registered with the global metrics registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    /// Register metric descriptions with the global registry.
    fn register_descriptions() {
        // Connection metrics
        describe_counter!(
            "checkout_connection_attempts_total",
            "Total wallet connection bootstraps started"
        );
        describe_counter!(
            "checkout_connection_results_total",
            "Connection bootstrap results by terminal status"
        );

        // Claim metrics
        describe_counter!(
            "checkout_claims_submitted_total",
            "Total flow-rate claim transactions submitted on L1"
        );
        describe_counter!(
            "checkout_claims_blocked_total",
            "Total claims halted on a known gas shortfall"
        );
        describe_counter!(
            "checkout_claims_failed_total",
            "Total failed claim runs by failure reason"
        );

        // View metrics
        describe_gauge!(
            "checkout_view_stack_depth",
            "Current depth of the navigation stack"
        );
    }

    /// Record the start of a connection bootstrap.
    pub fn record_connection_attempt(&self) {
        counter!("checkout_connection_attempts_total").increment(1);
    }

    /// Record the terminal status of a connection bootstrap.
    pub fn record_connection_result(&self, status: ConnectionStatus) {
        let status = match status {
            ConnectionStatus::Loading => "loading",
            ConnectionStatus::NotConnectedNoProvider => "not_connected_no_provider",
            ConnectionStatus::NotConnected => "not_connected",
            ConnectionStatus::ConnectedWrongNetwork => "connected_wrong_network",
            ConnectionStatus::ConnectedWithNetwork => "connected_with_network",
            ConnectionStatus::Error => "error",
        };
        counter!("checkout_connection_results_total", "status" => status).increment(1);
    }

    /// Record the outcome of a claim run.
    pub fn record_claim_outcome(&self, outcome: &ClaimOutcome) {
        match outcome {
            ClaimOutcome::Submitted { .. } => {
                counter!("checkout_claims_submitted_total").increment(1);
            }
            ClaimOutcome::InsufficientNativeGas => {
                counter!("checkout_claims_blocked_total").increment(1);
            }
            ClaimOutcome::Failed { reason } => {
                let reason = match reason {
                    ClaimFailureReason::WithdrawalFetch => "withdrawal_fetch",
                    ClaimFailureReason::SignerResolution => "signer_resolution",
                    ClaimFailureReason::NetworkSwitch => "network_switch",
                    ClaimFailureReason::Submission => "submission",
                    ClaimFailureReason::RejectedByUser => "rejected_by_user",
                };
                counter!("checkout_claims_failed_total", "reason" => reason).increment(1);
            }
        }
    }

    /// Set the current navigation stack depth.
    pub fn set_view_stack_depth(&self, depth: usize) {
        gauge!("checkout_view_stack_depth").set(depth as f64);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
