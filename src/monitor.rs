//! Balance-triggered swap loop.
//!
//! ```text
//! Idle ──► Polling ──(spendable > threshold)──► Triggered ──► Done
//!            ▲   │
//!            │   └──(network error)──► ErrorRecoverable
//!            └─────────(interval)──────────────┘
//! ```
//!
//! A swap is attempted at most once per monitor; whatever the outcome, the
//! monitor finishes after it.

use crate::client::{AmmSwapClient, SwapRequest};
use crate::consts::{SOL_DECIMALS, SOL_MINT};
use crate::error::{NetworkError, SwapError};
use crate::quote::UiAmount;
use crate::rpc::ChainClient;
use crate::shutdown::Shutdown;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::time::Duration;
use tracing::{error, info, warn};

/// The pool and token the monitor buys into once triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapTarget {
    pub amm_id: Pubkey,
    pub output_mint: Pubkey,
    pub slippage_percent: u64,
    pub recipient: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Lamports above the reserve that trigger the swap.
    pub threshold: u64,
    /// Lamports always left in the wallet for fees.
    pub reserve: u64,
    pub interval: Duration,
}

#[derive(Debug)]
pub enum MonitorState {
    Idle,
    Polling,
    Triggered { amount: u64 },
    ErrorRecoverable(NetworkError),
    Done(MonitorOutcome),
}

#[derive(Debug)]
pub enum MonitorOutcome {
    Swapped(Signature),
    SwapFailed(SwapError),
    Cancelled,
}

pub struct BalanceMonitor<'a, C> {
    client: AmmSwapClient<'a, C>,
    target: SwapTarget,
    settings: MonitorSettings,
    shutdown: Shutdown,
}

impl<'a, C: ChainClient> BalanceMonitor<'a, C> {
    pub fn new(
        client: AmmSwapClient<'a, C>,
        target: SwapTarget,
        settings: MonitorSettings,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            client,
            target,
            settings,
            shutdown,
        }
    }

    /// Drives the state machine to completion. Consumes the monitor so a
    /// finished run cannot be restarted.
    pub async fn run(mut self) -> MonitorOutcome {
        let mut state = MonitorState::Idle;
        loop {
            state = match state {
                MonitorState::Idle => {
                    info!(
                        "Monitoring balance of {}... Threshold: {} SOL",
                        self.client.owner(),
                        UiAmount::from_raw(self.settings.threshold, SOL_DECIMALS)
                    );
                    MonitorState::Polling
                }
                MonitorState::Polling => self.poll().await,
                MonitorState::Triggered { amount } => MonitorState::Done(self.swap(amount).await),
                MonitorState::ErrorRecoverable(err) => {
                    error!("Error in monitoring: {err}");
                    self.wait().await
                }
                MonitorState::Done(outcome) => return outcome,
            };
            if self.shutdown.is_cancelled() && !matches!(state, MonitorState::Done(_)) {
                state = MonitorState::Done(MonitorOutcome::Cancelled);
            }
        }
    }

    async fn poll(&mut self) -> MonitorState {
        let balance = match self.client.balance().await {
            Ok(balance) => balance,
            Err(err) => return MonitorState::ErrorRecoverable(err),
        };
        let spendable = balance.saturating_sub(self.settings.reserve);
        info!(
            "Current balance: {} SOL",
            UiAmount::from_raw(balance, SOL_DECIMALS)
        );

        if spendable > self.settings.threshold {
            info!("Balance exceeds threshold. Triggering swap...");
            MonitorState::Triggered { amount: spendable }
        } else {
            info!("Balance doesn't reach the threshold.");
            self.wait().await
        }
    }

    async fn wait(&mut self) -> MonitorState {
        tokio::select! {
            _ = tokio::time::sleep(self.settings.interval) => MonitorState::Polling,
            _ = self.shutdown.cancelled() => MonitorState::Done(MonitorOutcome::Cancelled),
        }
    }

    async fn swap(&self, amount: u64) -> MonitorOutcome {
        let request = SwapRequest {
            amm_id: self.target.amm_id,
            output_mint: self.target.output_mint,
            amount_in: UiAmount::from_raw(amount, SOL_DECIMALS),
            slippage_percent: self.target.slippage_percent,
            recipient: self.target.recipient,
            input_mint: Some(SOL_MINT),
        };
        match self.client.swap(&request).await {
            Ok(sig) => {
                info!("Swap executed. Exiting...");
                MonitorOutcome::Swapped(sig)
            }
            Err(err) => {
                warn!(
                    "Swap of {} SOL on pool {} failed: {err}",
                    request.amount_in, request.amm_id
                );
                MonitorOutcome::SwapFailed(err)
            }
        }
    }
}
