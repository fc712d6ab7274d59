//! Everything the swap instruction needs to know about one pool, gathered from
//! the decoded pool and market accounts.

use crate::authority::derive_market_authority;
use crate::consts::{LP_DECIMALS, POOL_VERSION};
use crate::error::DerivationError;
use crate::layout::{MarketState, PoolState};
use crate::network::NetworkContext;
use solana_sdk::pubkey::Pubkey;
use tracing::warn;

/// On-chain account addresses needed for a v4 swap.
///
/// Built fresh for every swap attempt; pool state can change between attempts
/// so these are never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolKeys {
    /// Pool account address.
    pub id: Pubkey,
    /// AMM program ID.
    pub program_id: Pubkey,
    pub status: u64,
    pub version: u8,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_decimals: u8,
    pub quote_decimals: u8,
    pub lp_decimals: u8,
    pub lp_mint: Pubkey,
    pub authority: Pubkey,
    pub open_orders: Pubkey,
    pub target_orders: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub market_program_id: Pubkey,
    pub market_id: Pubkey,
    pub market_bids: Pubkey,
    pub market_asks: Pubkey,
    pub market_event_queue: Pubkey,
    pub market_base_vault: Pubkey,
    pub market_quote_vault: Pubkey,
    pub market_authority: Pubkey,
}

impl PoolKeys {
    /// Decimals of `mint` if the pool trades it.
    pub fn decimals_of(&self, mint: &Pubkey) -> Option<u8> {
        if *mint == self.base_mint {
            Some(self.base_decimals)
        } else if *mint == self.quote_mint {
            Some(self.quote_decimals)
        } else {
            None
        }
    }
}

fn decimals(raw: u64) -> u8 {
    // Out-of-range exponents surface as InvalidAmount when the input is scaled.
    u8::try_from(raw).unwrap_or(u8::MAX)
}

/// Combines decoded state with the cluster's program set and the derived market
/// vault signer.
pub fn assemble_pool_keys(
    amm_id: &Pubkey,
    pool: &PoolState,
    market: &MarketState,
    network: &NetworkContext,
) -> Result<PoolKeys, DerivationError> {
    let programs = network.programs;
    if pool.market_program_id != programs.market {
        warn!(
            "Pool {} references market program {}, {} uses {}",
            amm_id, pool.market_program_id, network.cluster, programs.market
        );
    }
    let market_authority =
        derive_market_authority(&market.own_address, market.vault_signer_nonce, &programs.market)?;

    Ok(PoolKeys {
        id: *amm_id,
        program_id: programs.amm,
        status: pool.status,
        version: POOL_VERSION,
        base_mint: pool.base_mint,
        quote_mint: pool.quote_mint,
        base_decimals: decimals(pool.base_decimal),
        quote_decimals: decimals(pool.quote_decimal),
        lp_decimals: LP_DECIMALS,
        lp_mint: pool.lp_mint,
        authority: programs.amm_authority,
        open_orders: pool.open_orders,
        target_orders: pool.target_orders,
        base_vault: pool.base_vault,
        quote_vault: pool.quote_vault,
        market_program_id: programs.market,
        market_id: market.own_address,
        market_bids: market.bids,
        market_asks: market.asks,
        market_event_queue: market.event_queue,
        market_base_vault: market.base_vault,
        market_quote_vault: market.quote_vault,
        market_authority,
    })
}

/// Live reserves of a pool, in raw units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolReserves {
    pub base: u64,
    pub quote: u64,
}

impl PoolReserves {
    /// Vault balances less the PnL the pool still owes to itself.
    pub fn from_vaults(pool: &PoolState, base_vault_amount: u64, quote_vault_amount: u64) -> Self {
        Self {
            base: base_vault_amount.saturating_sub(pool.base_need_take_pnl),
            quote: quote_vault_amount.saturating_sub(pool.quote_need_take_pnl),
        }
    }
}
