use crate::{
    gas::{self, GasCheckResult},
    ClaimError, FALLBACK_CLAIM_GAS_LIMIT,
};
use alloy_primitives::{Address, U256};
use bus::{ClaimFailureReason, ClaimOutcome, Navigator};
use config::{CheckoutNetworks, RetryPolicy};
use std::sync::Arc;
use tokio_retry::Retry;
use tracing::{debug, info, warn};
use view::{bridge::BridgeView, Transition};
use wallet::{
    bridge::{BridgeIndex, WithdrawalClaim},
    slot::{ActiveProvider, ProviderSlot},
    ConnectOptions, ProviderError, SubmittedTransaction, WalletGateway, WalletProviderKind,
};

/// How a claim run ended without a hard failure.
#[derive(Debug, Clone)]
pub enum ClaimRun {
    /// The claim transaction was accepted and broadcast.
    Submitted(SubmittedTransaction),
    /// Known shortfall: halted before submission. The user can retry with
    /// a different account (force-switch) or dismiss.
    InsufficientNativeGas(GasCheckResult),
}

/// Drives a claimable flow-rate withdrawal to a submitted L1 transaction.
///
/// The pipeline's failure policy is deliberately asymmetric. The withdrawal
/// record, the signing wallet, the network switch and the submission itself
/// are load-bearing: their failures are terminal. The gas estimate, fee
/// data and balance lookups are advisory: each failure degrades to a safe
/// default and the pipeline proceeds. The only advisory result that halts
/// anything is a *known* shortfall of native balance against a *known* gas
/// cost.
pub struct WithdrawalClaimPipeline<G: WalletGateway, B: BridgeIndex> {
    gateway: G,
    bridge: B,
    slot: ProviderSlot<G::Provider>,
    navigator: Arc<Navigator>,
    networks: CheckoutNetworks,
    balance_retry: RetryPolicy,
}

impl<G: WalletGateway, B: BridgeIndex> WithdrawalClaimPipeline<G, B> {
    /// `slot` must be the connection orchestrator's slot: replacement
    /// providers are written back through it so later steps (and later
    /// flows) never act on a stale handle.
    pub fn new(
        gateway: G,
        bridge: B,
        slot: ProviderSlot<G::Provider>,
        navigator: Arc<Navigator>,
        networks: CheckoutNetworks,
    ) -> Self {
        Self {
            gateway,
            bridge,
            slot,
            navigator,
            networks,
            balance_retry: RetryPolicy::default(),
        }
    }

    /// Override the balance polling cadence.
    pub const fn with_balance_retry(mut self, policy: RetryPolicy) -> Self {
        self.balance_retry = policy;
        self
    }

    /// Run the claim flow for the withdrawal at `(recipient, index)`.
    ///
    /// `force_switch` re-enters the signer-resolution step with a forced
    /// account picker; it is set on the retry path after an
    /// insufficient-funds halt.
    pub async fn run(
        &self,
        recipient: Address,
        index: u64,
        force_switch: bool,
    ) -> Result<ClaimRun, ClaimError> {
        // Step 1: fetch the withdrawal record. The only failure that stops
        // the flow without a view change; the user retries by re-entering.
        let claim = match self.bridge.flow_rate_withdraw_tx(recipient, index).await {
            Ok(claim) => claim,
            Err(err) => {
                warn!(%recipient, index, error = %err, "withdrawal fetch failed");
                self.navigator.publish_claim_outcome(ClaimOutcome::Failed {
                    reason: ClaimFailureReason::WithdrawalFetch,
                });
                return Err(ClaimError::WithdrawalFetch(err));
            }
        };

        // Step 2: resolve a wallet that can sign on L1.
        let signer = match self.resolve_signer(&claim, force_switch).await {
            Ok(signer) => signer,
            Err(err) => return Err(err),
        };

        // Steps 3 and 4: advisory gas estimate and fee data, issued
        // concurrently. Neither failure aborts.
        let (estimate, fees) = tokio::join!(
            self.gateway
                .estimate_gas(&signer.provider, &claim.unsigned_transaction),
            self.gateway.fee_data(&signer.provider),
        );

        let estimated_gas_units = match estimate {
            Ok(units) => units,
            Err(err) => {
                debug!(error = %err, "gas estimate failed, using fallback limit");
                U256::from(FALLBACK_CLAIM_GAS_LIMIT)
            }
        };

        let gas_price_wei = match fees {
            Ok(fees) => fees.effective_gas_price(),
            Err(err) => {
                debug!(error = %err, "fee data lookup failed");
                None
            }
        };

        // Step 5: advisory balance lookup, with retries.
        let native_balance_wei = self.fetch_native_balance(&signer.provider).await;

        let check = GasCheckResult::evaluate(estimated_gas_units, gas_price_wei, native_balance_wei);
        debug!(?check, "gas check evaluated");

        // Step 6: the single advisory branch allowed to halt submission.
        if check.blocks_submission() {
            info!(
                balance = ?check.native_balance_wei,
                required = ?check.required_wei(),
                "active account cannot pay L1 gas for the claim"
            );
            self.navigator
                .dispatch(Transition::update(BridgeView::InsufficientNativeGas {
                    balance_wei: check.native_balance_wei,
                    required_wei: check.required_wei().unwrap_or_default(),
                }));
            self.navigator
                .publish_claim_outcome(ClaimOutcome::InsufficientNativeGas);
            return Ok(ClaimRun::InsufficientNativeGas(check));
        }

        // Step 7: the claim must be submitted on L1.
        let provider = self.ensure_l1_network(&claim, signer).await?;

        // Step 8: submit.
        match self
            .gateway
            .send_transaction(&provider, claim.unsigned_transaction.clone())
            .await
        {
            Ok(tx) => {
                info!(tx_hash = %tx.tx_hash, chain_id = tx.chain_id, "claim submitted");
                self.navigator
                    .dispatch(Transition::update(BridgeView::ClaimInProgress {
                        tx_hash: tx.tx_hash,
                    }));
                self.navigator
                    .publish_claim_outcome(ClaimOutcome::Submitted {
                        tx_hash: tx.tx_hash,
                    });
                Ok(ClaimRun::Submitted(tx))
            }
            Err(err) if err.is_rejection() => {
                info!("user rejected the claim transaction");
                self.offer_retry(&claim);
                Err(ClaimError::Submission(err))
            }
            Err(err) => {
                warn!(error = %err, "claim submission failed");
                self.fail_terminal(&err, ClaimFailureReason::Submission);
                Err(ClaimError::Submission(err))
            }
        }
    }

    /// Resolve the provider that will sign the claim.
    ///
    /// The embedded wallet cannot sign L1 transactions, and the
    /// insufficient-funds retry path wants a different account: both cases
    /// switch to the injected wallet with a forced account picker, and the
    /// replacement is written back into the shared slot.
    async fn resolve_signer(
        &self,
        claim: &WithdrawalClaim,
        force_switch: bool,
    ) -> Result<ActiveProvider<G::Provider>, ClaimError> {
        let Some(active) = self.slot.active() else {
            let err = ClaimError::NoActiveProvider;
            self.fail_terminal(&err, ClaimFailureReason::SignerResolution);
            return Err(err);
        };

        if !force_switch && active.kind.can_sign_l1() {
            return Ok(active);
        }

        debug!(
            active_kind = %active.kind,
            force_switch,
            "switching to the injected wallet for L1 signing"
        );

        let switched: Result<G::Provider, ProviderError> = async {
            let provider = self
                .gateway
                .create_provider(WalletProviderKind::Injected)
                .await?;
            self.gateway
                .connect(
                    &provider,
                    ConnectOptions {
                        request_wallet_permissions: true,
                    },
                )
                .await
        }
        .await;

        match switched {
            Ok(provider) => {
                self.slot
                    .install(WalletProviderKind::Injected, provider.clone());
                Ok(ActiveProvider {
                    kind: WalletProviderKind::Injected,
                    provider,
                })
            }
            Err(err) if err.is_rejection() => {
                info!("user declined the account picker");
                self.offer_retry(claim);
                Err(ClaimError::SignerResolution(err))
            }
            Err(err) => {
                warn!(error = %err, "signer resolution failed");
                let err = ClaimError::SignerResolution(err);
                self.fail_terminal(&err, ClaimFailureReason::SignerResolution);
                Err(err)
            }
        }
    }

    /// Confirm the signer is on L1, switching if necessary. The returned
    /// provider is whatever handle must be used for submission.
    async fn ensure_l1_network(
        &self,
        claim: &WithdrawalClaim,
        signer: ActiveProvider<G::Provider>,
    ) -> Result<G::Provider, ClaimError> {
        let l1_chain_id = self.networks.l1_chain_id();

        let network = match self.gateway.network_info(&signer.provider).await {
            Ok(network) => network,
            Err(err) => {
                warn!(error = %err, "network query failed before submission");
                let err = ClaimError::NetworkSwitch {
                    chain_id: l1_chain_id,
                    source: err,
                };
                self.fail_terminal(&err, ClaimFailureReason::NetworkSwitch);
                return Err(err);
            }
        };

        if network.chain_id == l1_chain_id {
            return Ok(signer.provider);
        }

        match self
            .gateway
            .switch_network(&signer.provider, l1_chain_id)
            .await
        {
            Ok(provider) => {
                // Write the replacement back through the owning slot.
                self.slot.install(signer.kind, provider.clone());
                Ok(provider)
            }
            Err(err) if err.is_rejection() => {
                info!("user declined the network switch");
                self.offer_retry(claim);
                Err(ClaimError::NetworkSwitch {
                    chain_id: l1_chain_id,
                    source: err,
                })
            }
            Err(err) => {
                warn!(error = %err, chain_id = l1_chain_id, "network switch failed");
                let err = ClaimError::NetworkSwitch {
                    chain_id: l1_chain_id,
                    source: err,
                };
                self.fail_terminal(&err, ClaimFailureReason::NetworkSwitch);
                Err(err)
            }
        }
    }

    /// Poll the signer's L1 balances and pick out the native token.
    /// Returns `None` when the lookup keeps failing: unknown, not fatal.
    async fn fetch_native_balance(&self, provider: &G::Provider) -> Option<U256> {
        let chain_id = self.networks.l1_chain_id();
        let result = Retry::spawn(self.balance_retry.intervals(), || async {
            self.gateway.balances(provider, chain_id).await.map_err(|err| {
                debug!(error = %err, "balance poll failed, will retry");
                err
            })
        })
        .await;

        match result {
            Ok(balances) => gas::native_balance(&balances),
            Err(err) => {
                debug!(error = %err, "balance lookup exhausted retries");
                None
            }
        }
    }

    /// Send the user back to the claim screen: a retry affordance, not a
    /// failure screen.
    fn offer_retry(&self, claim: &WithdrawalClaim) {
        self.navigator
            .dispatch(Transition::update(BridgeView::ClaimWithdrawal {
                recipient: claim.recipient,
                index: claim.index,
                timeout_end: claim.timeout_end,
            }));
        self.navigator.publish_claim_outcome(ClaimOutcome::Failed {
            reason: ClaimFailureReason::RejectedByUser,
        });
    }

    fn fail_terminal(&self, err: &dyn std::fmt::Display, reason: ClaimFailureReason) {
        self.navigator
            .dispatch(Transition::update(BridgeView::ClaimError {
                message: err.to_string(),
            }));
        self.navigator
            .publish_claim_outcome(ClaimOutcome::Failed { reason });
    }
}
