//! Balance-triggered swaps through Raydium AMM v4 pools on Solana.
//!
//! This crate provides:
//! - Decoding of pool, market and token account data (`layout`).
//! - Assembly of every key a v4 swap touches, including the market authority
//!   (`pool_keys`, `authority`).
//! - Constant-product quotes with the pool fee and a slippage floor (`quote`).
//! - The `SwapBaseIn` instruction and the transaction around it (`instruction`, `transaction`).
//! - A monitor that swaps a wallet's balance once it crosses a threshold (`monitor`).
//!
//! # Examples
//!
//! ```no_run
//! use raydium_threshold_swap::client::{AmmSwapClient, SwapRequest};
//! use raydium_threshold_swap::network::{Cluster, NetworkContext};
//! use raydium_threshold_swap::rpc::SolanaRpc;
//! use raydium_threshold_swap::shutdown::Shutdown;
//! use solana_sdk::signature::Keypair;
//! use solana_sdk::signer::Signer;
//! use std::time::Duration;
//! # async fn run() -> anyhow::Result<()> {
//! let network = NetworkContext::new(Cluster::Devnet, None);
//! let rpc = SolanaRpc::new(network.rpc_url.clone(), Duration::from_secs(60), Shutdown::never());
//! let owner = Keypair::new();
//! let client = AmmSwapClient::new(&rpc, &owner, &network);
//! let request = SwapRequest {
//!     amm_id: "...".parse()?,
//!     output_mint: "...".parse()?,
//!     amount_in: "0.01".parse()?,
//!     slippage_percent: 2,
//!     recipient: owner.pubkey(),
//!     input_mint: None,
//! };
//! let prepared = client.prepare_swap(&request).await?;
//! println!("You'll get at least {} tokens", prepared.quote.min_amount_out);
//! # Ok(())
//! # }
//! ```
pub mod authority;
pub mod client;
pub mod config;
pub mod consts;
pub mod error;
pub mod helpers;
pub mod instruction;
pub mod layout;
pub mod monitor;
pub mod network;
pub mod pool_keys;
pub mod quote;
pub mod rpc;
pub mod shutdown;
pub mod transaction;

#[cfg(test)]
mod testing;
