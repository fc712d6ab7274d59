//! Startup configuration: `.env`, environment and command line, validated once.

use crate::consts::SOL_DECIMALS;
use crate::error::ConfigError;
use crate::helpers::{from_bytes_to_key_pair, parse_pubkey};
use crate::monitor::{MonitorSettings, SwapTarget};
use crate::network::{Cluster, NetworkContext};
use crate::quote::UiAmount;
use anyhow::Context;
use clap::Parser;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::time::Duration;

/// Swap a wallet's SOL into a Raydium v4 pool once its balance passes a threshold.
///
/// Every flag falls back to the environment variable shown.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about)]
pub struct Cli {
    /// mainnet-beta, testnet or devnet
    #[arg(long, env = "RPC_CLUSTER")]
    pub cluster: Option<String>,
    /// Overrides the cluster's public RPC endpoint
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,
    /// AMM pool to swap through
    #[arg(long, env = "POOL_ID")]
    pub pool_id: Option<String>,
    /// Token to buy
    #[arg(long, env = "TOKEN_MINT_ADDRESS")]
    pub output_mint: Option<String>,
    /// Owner of the account receiving the bought token (defaults to the signer)
    #[arg(long, env = "OUTPUT_WALLET")]
    pub output_wallet: Option<String>,
    /// SOL above the reserve that triggers the swap
    #[arg(long, env = "THRESHOLD_AMOUNT", default_value = "1.0")]
    pub threshold: String,
    /// SOL kept back for fees
    #[arg(long, env = "RESERVE_AMOUNT", default_value = "0.01")]
    pub reserve: String,
    #[arg(long, env = "SLIPPAGE_PERCENT", default_value = "2")]
    pub slippage: String,
    #[arg(long, env = "INTERVAL_PERIOD", default_value = "10000")]
    pub interval_ms: String,
    #[arg(long, env = "CONFIRM_TIMEOUT_MS", default_value = "60000")]
    pub confirm_timeout_ms: String,
}

pub struct Config {
    pub network: NetworkContext,
    pub signer: Keypair,
    pub pool_id: Pubkey,
    pub output_mint: Pubkey,
    pub output_wallet: Pubkey,
    pub threshold: u64,
    pub reserve: u64,
    pub slippage_percent: u64,
    pub interval: Duration,
    pub confirm_timeout: Duration,
}

fn sol_to_lamports(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<UiAmount>()
        .and_then(|amount| amount.to_raw(SOL_DECIMALS))
        .map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        })
}

fn parse_u64(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("{value:?} is not a non-negative integer"),
    })
}

fn positive_millis(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match parse_u64(name, value)? {
        0 => Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".into(),
        }),
        ms => Ok(Duration::from_millis(ms)),
    }
}

impl Config {
    /// Loads `.env` if present, parses the command line and validates.
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        let cli = Cli::parse();
        let secret = std::env::var("CREATOR_PRIVATE_KEY").ok();
        Self::from_cli(cli, secret.as_deref()).context("invalid configuration")
    }

    pub fn from_cli(cli: Cli, secret: Option<&str>) -> Result<Self, ConfigError> {
        let cluster = match cli.cluster.as_deref().map(str::trim) {
            None | Some("") => Cluster::default(),
            Some(name) => name.parse()?,
        };
        let secret = secret.ok_or(ConfigError::Missing("CREATOR_PRIVATE_KEY"))?;
        let signer = from_bytes_to_key_pair(secret)?;
        let pool_id = parse_pubkey(
            "POOL_ID",
            cli.pool_id.as_deref().ok_or(ConfigError::Missing("POOL_ID"))?,
        )?;
        let output_mint = parse_pubkey(
            "TOKEN_MINT_ADDRESS",
            cli.output_mint
                .as_deref()
                .ok_or(ConfigError::Missing("TOKEN_MINT_ADDRESS"))?,
        )?;
        let output_wallet = match cli.output_wallet.as_deref() {
            Some(wallet) => parse_pubkey("OUTPUT_WALLET", wallet)?,
            None => signer.pubkey(),
        };
        let slippage_percent = parse_u64("SLIPPAGE_PERCENT", &cli.slippage)?;
        if slippage_percent > 100 {
            return Err(ConfigError::Invalid {
                name: "SLIPPAGE_PERCENT",
                reason: format!("{slippage_percent} is above 100"),
            });
        }

        Ok(Self {
            network: NetworkContext::new(cluster, cli.rpc_url),
            signer,
            pool_id,
            output_mint,
            output_wallet,
            threshold: sol_to_lamports("THRESHOLD_AMOUNT", &cli.threshold)?,
            reserve: sol_to_lamports("RESERVE_AMOUNT", &cli.reserve)?,
            slippage_percent,
            interval: positive_millis("INTERVAL_PERIOD", &cli.interval_ms)?,
            confirm_timeout: positive_millis("CONFIRM_TIMEOUT_MS", &cli.confirm_timeout_ms)?,
        })
    }

    pub fn swap_target(&self) -> SwapTarget {
        SwapTarget {
            amm_id: self.pool_id,
            output_mint: self.output_mint,
            slippage_percent: self.slippage_percent,
            recipient: self.output_wallet,
        }
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            threshold: self.threshold,
            reserve: self.reserve,
            interval: self.interval,
        }
    }
}
