use alloy_primitives::Address;
use checkout::{
    config::Config,
    metrics::{install_prometheus_exporter, Metrics},
};
use clap::{Parser, Subcommand};
use tracing::info;
use wallet::WalletProviderKind;

#[derive(Parser)]
#[command(name = "checkout", about = "Headless driver for the checkout flows")]
struct Cli {
    /// Path to the harness configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the wallet connection bootstrap once and report the status
    Connect,
    /// Claim a flow-rate withdrawal on L1
    Claim {
        /// Address the withdrawal releases funds to
        recipient: Address,
        /// Position in the recipient's pending withdrawal queue
        index: u64,
        /// Force the wallet account picker before claiming
        #[arg(long)]
        force_switch: bool,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Loading config: {}", cli.config);
    let config = Config::from_file(&cli.config)?;
    let private_key = Config::private_key()?;

    let metrics = Metrics::new();
    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!("Prometheus exporter listening on port {port}");
    }

    let harness = checkout::build(&config, &private_key)?;

    let outcome_metrics = metrics.clone();
    let _sub = harness.navigator.bus().subscribe(move |event| {
        if let bus::CheckoutEvent::ClaimOutcome { outcome } = event {
            outcome_metrics.record_claim_outcome(outcome);
        }
    });

    match cli.command {
        Command::Connect => {
            metrics.record_connection_attempt();
            let status = harness
                .orchestrator
                .run(Some(WalletProviderKind::Injected))
                .await;
            metrics.record_connection_result(status);
            info!(?status, view = ?harness.navigator.current(), "connection bootstrap finished");
        }
        Command::Claim {
            recipient,
            index,
            force_switch,
        } => {
            // The pipeline needs a connected wallet in the slot.
            metrics.record_connection_attempt();
            let status = harness
                .orchestrator
                .run(Some(WalletProviderKind::Injected))
                .await;
            metrics.record_connection_result(status);

            match harness.pipeline.run(recipient, index, force_switch).await {
                Ok(claim::ClaimRun::Submitted(tx)) => {
                    info!(tx_hash = %tx.tx_hash, "claim submitted");
                }
                Ok(claim::ClaimRun::InsufficientNativeGas(check)) => {
                    info!(
                        balance = ?check.native_balance_wei,
                        required = ?check.required_wei(),
                        "claim halted: account cannot pay L1 gas"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    metrics.set_view_stack_depth(harness.navigator.snapshot().depth());
    Ok(())
}
