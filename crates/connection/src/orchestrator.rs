use crate::ConnectionStatus;
use bus::Navigator;
use config::CheckoutNetworks;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};
use tracing::{debug, warn};
use view::{
    bridge::{BridgeFormStash, BridgeView},
    Transition,
};
use wallet::{slot::ProviderSlot, ProviderError, WalletGateway, WalletProviderKind};

/// Decides the connection status for one checkout instance and dispatches
/// the matching navigation transition.
///
/// [`ConnectionOrchestrator::run`] re-runs whenever the (checkout instance,
/// wallet preference, injected provider) triple changes identity. Runs are
/// numbered; a run that finishes after a newer one has started discards its
/// result instead of applying it, so a slow early run can never overwrite a
/// fast later one.
pub struct ConnectionOrchestrator<G: WalletGateway> {
    gateway: G,
    slot: ProviderSlot<G::Provider>,
    navigator: Arc<Navigator>,
    networks: CheckoutNetworks,
    check_network: bool,
    run_seq: AtomicU64,
    status: Mutex<ConnectionStatus>,
}

impl<G: WalletGateway> ConnectionOrchestrator<G> {
    pub fn new(gateway: G, navigator: Arc<Navigator>, networks: CheckoutNetworks) -> Self {
        Self {
            gateway,
            slot: ProviderSlot::new(),
            navigator,
            networks,
            check_network: true,
            run_seq: AtomicU64::new(0),
            status: Mutex::new(ConnectionStatus::Loading),
        }
    }

    /// Disable the chain allow-list check (some widgets run chain-agnostic).
    pub fn without_network_check(mut self) -> Self {
        self.check_network = false;
        self
    }

    /// The slot owning the active provider handle. The claim pipeline reads
    /// and force-switch-replaces the provider through this.
    pub fn slot(&self) -> ProviderSlot<G::Provider> {
        self.slot.clone()
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    pub const fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    /// The status committed by the most recent completed run.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the bootstrapping algorithm once.
    ///
    /// Returns the status this run committed, or the already-current status
    /// if the run went stale or stopped silently on a transient network
    /// failure.
    pub async fn run(&self, preference: Option<WalletProviderKind>) -> ConnectionStatus {
        let token = self.run_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let active = self.slot.active();

        // Nothing to drive a connection with: ask the user to pick a wallet.
        let Some(active) = active else {
            let Some(kind) = preference else {
                self.commit(
                    token,
                    ConnectionStatus::NotConnectedNoProvider,
                    Some(wallet_selection()),
                );
                return self.status();
            };

            // A preference exists but no provider object yet: create one.
            match self.gateway.create_provider(kind).await {
                Ok(provider) => {
                    if self.is_current(token) {
                        self.slot.install(kind, provider);
                    }
                    // The user still has to connect explicitly.
                    self.commit(token, ConnectionStatus::NotConnected, Some(wallet_selection()));
                }
                Err(ProviderError::NoDefaultProvider(kind)) => {
                    debug!(%kind, "no default provider available");
                    self.commit(
                        token,
                        ConnectionStatus::NotConnectedNoProvider,
                        Some(wallet_selection()),
                    );
                }
                Err(err) => {
                    warn!(%kind, error = %err, "provider creation failed");
                    self.commit(
                        token,
                        ConnectionStatus::Error,
                        Some(Transition::update(BridgeView::Error {
                            message: err.to_string(),
                        })),
                    );
                }
            }
            return self.status();
        };

        match self.gateway.is_wallet_connected(&active.provider).await {
            Ok(true) => {}
            Ok(false) => {
                self.commit(token, ConnectionStatus::NotConnected, Some(wallet_selection()));
                return self.status();
            }
            Err(err) => {
                warn!(error = %err, "connection check failed");
                self.commit(
                    token,
                    ConnectionStatus::Error,
                    Some(Transition::update(BridgeView::Error {
                        message: err.to_string(),
                    })),
                );
                return self.status();
            }
        }

        let network = match self.gateway.network_info(&active.provider).await {
            Ok(network) => network,
            Err(err) => {
                // Transient RPC failures during polling are expected: stay
                // in the current status and let the next run retry.
                debug!(error = %err, "network query failed, staying put");
                return self.status();
            }
        };

        if self.check_network && (!self.networks.is_allowed(network.chain_id) || !network.is_supported)
        {
            debug!(chain_id = network.chain_id, "wallet is on a disallowed chain");
            self.commit(
                token,
                ConnectionStatus::ConnectedWrongNetwork,
                Some(Transition::update(BridgeView::SwitchNetwork {
                    required_chain_id: self.networks.l2_chain_id(),
                })),
            );
            return self.status();
        }

        // Best-effort identification; never blocks progression.
        if let Err(err) = self.gateway.identify(&active.provider).await {
            debug!(error = %err, "identification failed, ignoring");
        }

        self.commit(
            token,
            ConnectionStatus::ConnectedWithNetwork,
            Some(Transition::update(BridgeView::BridgeForm {
                stash: BridgeFormStash::default(),
            })),
        );
        self.status()
    }

    fn is_current(&self, token: u64) -> bool {
        self.run_seq.load(Ordering::SeqCst) == token
    }

    /// Apply a run's result unless a newer run has started since.
    fn commit(
        &self,
        token: u64,
        status: ConnectionStatus,
        transition: Option<Transition<BridgeView>>,
    ) {
        if !self.is_current(token) {
            debug!(?status, "discarding result of stale bootstrap run");
            return;
        }

        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
        if let Some(transition) = transition {
            self.navigator.dispatch(transition);
        }
    }
}

fn wallet_selection() -> Transition<BridgeView> {
    Transition::update(BridgeView::WalletNetworkSelection)
}
