pub mod config;
pub mod metrics;

use ::config::CheckoutNetworks;
use bus::Navigator;
use claim::WithdrawalClaimPipeline;
use client::{BridgeIndexClient, RpcWalletGateway};
use connection::ConnectionOrchestrator;
use std::sync::Arc;
use view::bridge::BridgeView;

use crate::config::Config;

/// One fully wired checkout instance: shared navigator, connection
/// orchestrator and claim pipeline over the same gateway and provider
/// slot.
pub struct CheckoutHarness {
    pub navigator: Arc<Navigator>,
    pub orchestrator: ConnectionOrchestrator<RpcWalletGateway>,
    pub pipeline: WithdrawalClaimPipeline<RpcWalletGateway, BridgeIndexClient>,
}

/// Wire a checkout instance from the harness configuration. Fresh
/// providers start on L2; claims switch to L1 on demand.
pub fn build(cfg: &Config, private_key: &str) -> eyre::Result<CheckoutHarness> {
    let networks = CheckoutNetworks::from_network_type(cfg.network);
    let endpoints = [
        (networks.l1_chain_id(), cfg.l1_rpc_url.clone()),
        (networks.l2_chain_id(), cfg.l2_rpc_url.clone()),
    ];

    let gateway = RpcWalletGateway::new(private_key, networks.l2_chain_id(), endpoints)?;
    let bridge = BridgeIndexClient::new(cfg.bridge_api_url.clone());
    let navigator = Arc::new(Navigator::new(BridgeView::Loading));

    let orchestrator =
        ConnectionOrchestrator::new(gateway.clone(), Arc::clone(&navigator), networks.clone());
    let pipeline = WithdrawalClaimPipeline::new(
        gateway,
        bridge,
        orchestrator.slot(),
        Arc::clone(&navigator),
        networks,
    );

    Ok(CheckoutHarness {
        navigator,
        orchestrator,
        pipeline,
    })
}
