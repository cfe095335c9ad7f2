//! Common mocks shared across the flow integration tests.
#![allow(dead_code)]

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use bus::{CheckoutEvent, ClaimOutcome, Navigator, Subscription};
use claim::WithdrawalClaimPipeline;
use config::{CheckoutNetworks, RetryPolicy};
use std::sync::{Arc, Mutex};
use view::bridge::BridgeView;
use wallet::{
    bridge::{BridgeIndex, BridgeIndexError, WithdrawalClaim},
    slot::ProviderSlot,
    ConnectOptions, FeeData, NetworkInfo, ProviderError, SubmittedTransaction, TokenBalance,
    WalletGateway, WalletProviderKind,
};

pub const L1_CHAIN: u64 = 11155111;
pub const L2_CHAIN: u64 = 13473;

pub const RECIPIENT: Address = Address::repeat_byte(0x11);
pub const INDEX: u64 = 2;
pub const TIMEOUT_END: u64 = 1_700_000_000;

/// Opaque provider handle; the label tells tests which handle a call used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle(pub &'static str);

#[derive(Debug, Clone, Copy)]
pub enum Fail {
    Rejected,
    Rpc,
}

impl Fail {
    fn err(self) -> ProviderError {
        match self {
            Self::Rejected => ProviderError::Rejected,
            Self::Rpc => ProviderError::Rpc("mock rpc failure".into()),
        }
    }
}

/// Scripted wallet gateway. Defaults to a connected injected wallet on L1
/// with plenty of native balance; tests override the step they exercise.
pub struct MockGateway {
    pub create: Result<(), Fail>,
    pub connect: Result<(), Fail>,
    /// Chain the wallet reports from `network_info`.
    pub chain_id: u64,
    pub network_fails: bool,
    pub switch: Result<(), Fail>,
    pub estimate_fails: bool,
    pub fee_data: Result<FeeData, ()>,
    /// One native balance result per attempt; the last entry repeats.
    pub balances: Mutex<Vec<Result<U256, ()>>>,
    pub send: Result<(), Fail>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            create: Ok(()),
            connect: Ok(()),
            chain_id: L1_CHAIN,
            network_fails: false,
            switch: Ok(()),
            estimate_fails: false,
            fee_data: Ok(FeeData {
                last_base_fee_per_gas: None,
                max_priority_fee_per_gas: None,
                gas_price: Some(U256::from(2)),
            }),
            balances: Mutex::new(vec![Ok(U256::from(10_000_000u64))]),
            send: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockGateway {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|call| call.starts_with(prefix))
    }
}

impl WalletGateway for &MockGateway {
    type Provider = Handle;

    async fn create_provider(&self, kind: WalletProviderKind) -> Result<Handle, ProviderError> {
        self.record(format!("create_provider:{kind}"));
        self.create.map(|()| Handle("fresh")).map_err(Fail::err)
    }

    async fn is_wallet_connected(&self, _provider: &Handle) -> Result<bool, ProviderError> {
        self.record("is_wallet_connected".into());
        Ok(true)
    }

    async fn connect(
        &self,
        _provider: &Handle,
        options: ConnectOptions,
    ) -> Result<Handle, ProviderError> {
        self.record(format!("connect:{}", options.request_wallet_permissions));
        self.connect.map(|()| Handle("connected")).map_err(Fail::err)
    }

    async fn network_info(&self, _provider: &Handle) -> Result<NetworkInfo, ProviderError> {
        self.record("network_info".into());
        if self.network_fails {
            return Err(ProviderError::Rpc("network query failed".into()));
        }
        Ok(NetworkInfo {
            chain_id: self.chain_id,
            is_supported: true,
        })
    }

    async fn switch_network(
        &self,
        _provider: &Handle,
        chain_id: u64,
    ) -> Result<Handle, ProviderError> {
        self.record(format!("switch_network:{chain_id}"));
        self.switch.map(|()| Handle("switched")).map_err(Fail::err)
    }

    async fn estimate_gas(
        &self,
        _provider: &Handle,
        _tx: &TransactionRequest,
    ) -> Result<U256, ProviderError> {
        self.record("estimate_gas".into());
        if self.estimate_fails {
            return Err(ProviderError::Rpc("estimation failed".into()));
        }
        Ok(U256::from(100_000))
    }

    async fn fee_data(&self, _provider: &Handle) -> Result<FeeData, ProviderError> {
        self.record("fee_data".into());
        self.fee_data
            .map_err(|()| ProviderError::Rpc("fee data failed".into()))
    }

    async fn balances(
        &self,
        _provider: &Handle,
        _chain_id: u64,
    ) -> Result<Vec<TokenBalance>, ProviderError> {
        self.record("balances".into());
        let next = {
            let mut scripted = self.balances.lock().unwrap();
            if scripted.len() > 1 {
                scripted.remove(0)
            } else {
                scripted[0]
            }
        };
        next.map(|amount_wei| {
            vec![TokenBalance {
                token_address: Address::ZERO,
                amount_wei,
            }]
        })
        .map_err(|()| ProviderError::Rpc("balance lookup failed".into()))
    }

    async fn send_transaction(
        &self,
        provider: &Handle,
        _tx: TransactionRequest,
    ) -> Result<SubmittedTransaction, ProviderError> {
        self.record(format!("send_transaction:{}", provider.0));
        self.send
            .map(|()| SubmittedTransaction {
                tx_hash: TxHash::repeat_byte(0xab),
                chain_id: self.chain_id,
            })
            .map_err(Fail::err)
    }

    async fn identify(&self, _provider: &Handle) -> Result<(), ProviderError> {
        self.record("identify".into());
        Ok(())
    }
}

/// Scripted transactions index.
#[derive(Debug, Default)]
pub struct MockBridge {
    pub fails: bool,
    pub missing: bool,
}

impl BridgeIndex for &MockBridge {
    async fn flow_rate_withdraw_tx(
        &self,
        recipient: Address,
        index: u64,
    ) -> Result<WithdrawalClaim, BridgeIndexError> {
        if self.fails {
            return Err(BridgeIndexError::Http("index unavailable".into()));
        }
        if self.missing {
            return Err(BridgeIndexError::NotFound { recipient, index });
        }
        Ok(WithdrawalClaim {
            recipient,
            index,
            can_withdraw: true,
            unsigned_transaction: TransactionRequest::default(),
            timeout_end: TIMEOUT_END,
        })
    }
}

/// A claim pipeline wired to mocks, with every published event captured.
pub struct Rig<'a> {
    pub pipeline: WithdrawalClaimPipeline<&'a MockGateway, &'a MockBridge>,
    pub navigator: Arc<Navigator>,
    pub slot: ProviderSlot<Handle>,
    pub outcomes: Arc<Mutex<Vec<ClaimOutcome>>>,
    pub views: Arc<Mutex<Vec<BridgeView>>>,
    _sub: Subscription<CheckoutEvent>,
}

impl Rig<'_> {
    pub fn outcomes(&self) -> Vec<ClaimOutcome> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn views(&self) -> Vec<BridgeView> {
        self.views.lock().unwrap().clone()
    }
}

pub fn rig<'a>(gateway: &'a MockGateway, bridge: &'a MockBridge) -> Rig<'a> {
    rig_with_retry(gateway, bridge, RetryPolicy::once())
}

pub fn rig_with_retry<'a>(
    gateway: &'a MockGateway,
    bridge: &'a MockBridge,
    balance_retry: RetryPolicy,
) -> Rig<'a> {
    let navigator = Arc::new(Navigator::new(BridgeView::ClaimWithdrawal {
        recipient: RECIPIENT,
        index: INDEX,
        timeout_end: TIMEOUT_END,
    }));
    let slot = ProviderSlot::new();

    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let views = Arc::new(Mutex::new(Vec::new()));
    let sub = {
        let outcomes = Arc::clone(&outcomes);
        let views = Arc::clone(&views);
        navigator.bus().subscribe(move |event| match event {
            CheckoutEvent::ClaimOutcome { outcome } => {
                outcomes.lock().unwrap().push(outcome.clone());
            }
            CheckoutEvent::ViewChanged { view } => {
                views.lock().unwrap().push(view.clone());
            }
        })
    };

    let pipeline = WithdrawalClaimPipeline::new(
        gateway,
        bridge,
        slot.clone(),
        Arc::clone(&navigator),
        CheckoutNetworks::testnet(),
    )
    .with_balance_retry(balance_retry);

    Rig {
        pipeline,
        navigator,
        slot,
        outcomes,
        views,
        _sub: sub,
    }
}
