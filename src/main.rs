use anyhow::bail;
use raydium_threshold_swap::client::AmmSwapClient;
use raydium_threshold_swap::config::Config;
use raydium_threshold_swap::monitor::{BalanceMonitor, MonitorOutcome};
use raydium_threshold_swap::rpc::SolanaRpc;
use raydium_threshold_swap::shutdown::Shutdown;
use solana_sdk::signer::Signer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load()?;
    info!(
        "Wallet {} on {} via {}",
        config.signer.pubkey(),
        config.network.cluster,
        config.network.rpc_url
    );

    let (trigger, shutdown) = Shutdown::new();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, shutting down");
                trigger.cancel();
            }
            Err(e) => error!("Unable to listen for Ctrl-C: {e}"),
        }
    });

    let rpc = SolanaRpc::new(
        config.network.rpc_url.clone(),
        config.confirm_timeout,
        shutdown.clone(),
    );
    let client = AmmSwapClient::new(&rpc, &config.signer, &config.network);
    let monitor = BalanceMonitor::new(
        client,
        config.swap_target(),
        config.monitor_settings(),
        shutdown,
    );

    match monitor.run().await {
        MonitorOutcome::Swapped(sig) => info!("Done: {sig}"),
        MonitorOutcome::Cancelled => info!("Stopped before any swap"),
        MonitorOutcome::SwapFailed(err) => bail!("swap failed: {err}"),
    }
    Ok(())
}
