//! Fixed-layout account decoding.
//!
//! Every on-chain account we read is described by a [`Layout`]: a total size and
//! a table of `(name, offset, width)` entries. [`decode`] checks the size once,
//! after which typed reads through the table cannot go out of bounds. All
//! integers are little-endian.
//!
//! Offsets follow Raydium's `LIQUIDITY_STATE_LAYOUT_V4`, OpenBook/Serum
//! `MARKET_STATE_LAYOUT_V3` and the SPL token account layout. A change in any of
//! those programs is a table change here, nothing else.

use crate::error::DecodeError;
use arrayref::array_ref;
use solana_sdk::pubkey::Pubkey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U64,
    Pubkey,
}

impl Width {
    pub const fn len(self) -> usize {
        match self {
            Width::U64 => 8,
            Width::Pubkey => 32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: Width,
}

impl Field {
    const fn u64(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            width: Width::U64,
        }
    }

    const fn pubkey(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            width: Width::Pubkey,
        }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width.len()
    }
}

#[derive(Debug)]
pub struct Layout {
    pub name: &'static str,
    pub size: usize,
    pub fields: &'static [Field],
}

/// Raydium AMM v4 pool state. Only the fields the swap needs are listed; the
/// remaining bytes are counters and padding.
pub mod liquidity_v4 {
    use super::{Field, Layout};

    pub const STATUS: Field = Field::u64("status", 0);
    pub const NONCE: Field = Field::u64("nonce", 8);
    pub const BASE_DECIMAL: Field = Field::u64("baseDecimal", 32);
    pub const QUOTE_DECIMAL: Field = Field::u64("quoteDecimal", 40);
    pub const BASE_NEED_TAKE_PNL: Field = Field::u64("baseNeedTakePnl", 192);
    pub const QUOTE_NEED_TAKE_PNL: Field = Field::u64("quoteNeedTakePnl", 200);
    pub const BASE_VAULT: Field = Field::pubkey("baseVault", 336);
    pub const QUOTE_VAULT: Field = Field::pubkey("quoteVault", 368);
    pub const BASE_MINT: Field = Field::pubkey("baseMint", 400);
    pub const QUOTE_MINT: Field = Field::pubkey("quoteMint", 432);
    pub const LP_MINT: Field = Field::pubkey("lpMint", 464);
    pub const OPEN_ORDERS: Field = Field::pubkey("openOrders", 496);
    pub const MARKET_ID: Field = Field::pubkey("marketId", 528);
    pub const MARKET_PROGRAM_ID: Field = Field::pubkey("marketProgramId", 560);
    pub const TARGET_ORDERS: Field = Field::pubkey("targetOrders", 592);

    pub static LAYOUT: Layout = Layout {
        name: "LiquidityStateV4",
        size: 752,
        fields: &[
            STATUS,
            NONCE,
            BASE_DECIMAL,
            QUOTE_DECIMAL,
            BASE_NEED_TAKE_PNL,
            QUOTE_NEED_TAKE_PNL,
            BASE_VAULT,
            QUOTE_VAULT,
            BASE_MINT,
            QUOTE_MINT,
            LP_MINT,
            OPEN_ORDERS,
            MARKET_ID,
            MARKET_PROGRAM_ID,
            TARGET_ORDERS,
        ],
    };
}

/// OpenBook market state v3. Starts with the 5-byte `serum` head padding and
/// ends with 7 bytes of tail padding.
pub mod market_v3 {
    use super::{Field, Layout};

    pub const OWN_ADDRESS: Field = Field::pubkey("ownAddress", 13);
    pub const VAULT_SIGNER_NONCE: Field = Field::u64("vaultSignerNonce", 45);
    pub const BASE_MINT: Field = Field::pubkey("baseMint", 53);
    pub const QUOTE_MINT: Field = Field::pubkey("quoteMint", 85);
    pub const BASE_VAULT: Field = Field::pubkey("baseVault", 117);
    pub const QUOTE_VAULT: Field = Field::pubkey("quoteVault", 165);
    pub const EVENT_QUEUE: Field = Field::pubkey("eventQueue", 253);
    pub const BIDS: Field = Field::pubkey("bids", 285);
    pub const ASKS: Field = Field::pubkey("asks", 317);

    pub static LAYOUT: Layout = Layout {
        name: "MarketStateV3",
        size: 388,
        fields: &[
            OWN_ADDRESS,
            VAULT_SIGNER_NONCE,
            BASE_MINT,
            QUOTE_MINT,
            BASE_VAULT,
            QUOTE_VAULT,
            EVENT_QUEUE,
            BIDS,
            ASKS,
        ],
    };
}

/// SPL token account.
pub mod token_account {
    use super::{Field, Layout};

    pub const MINT: Field = Field::pubkey("mint", 0);
    pub const OWNER: Field = Field::pubkey("owner", 32);
    pub const AMOUNT: Field = Field::u64("amount", 64);

    pub static LAYOUT: Layout = Layout {
        name: "TokenAccount",
        size: 165,
        fields: &[MINT, OWNER, AMOUNT],
    };
}

/// A size-checked view over an account buffer.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    layout: &'static Layout,
    data: &'a [u8],
}

impl<'a> Record<'a> {
    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    pub fn u64(&self, field: Field) -> u64 {
        debug_assert_eq!(field.width, Width::U64, "{} is not a u64", field.name);
        u64::from_le_bytes(*array_ref![self.data, field.offset, 8])
    }

    pub fn pubkey(&self, field: Field) -> Pubkey {
        debug_assert_eq!(field.width, Width::Pubkey, "{} is not a pubkey", field.name);
        Pubkey::new_from_array(*array_ref![self.data, field.offset, 32])
    }
}

/// Checks `data` against `layout` and returns a view for typed field reads.
pub fn decode<'a>(layout: &'static Layout, data: &'a [u8]) -> Result<Record<'a>, DecodeError> {
    if data.len() != layout.size {
        return Err(DecodeError::SizeMismatch {
            layout: layout.name,
            expected: layout.size,
            actual: data.len(),
        });
    }
    Ok(Record { layout, data })
}

/// Decoded Raydium AMM v4 pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub status: u64,
    pub nonce: u64,
    pub base_decimal: u64,
    pub quote_decimal: u64,
    pub base_need_take_pnl: u64,
    pub quote_need_take_pnl: u64,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub open_orders: Pubkey,
    pub market_id: Pubkey,
    pub market_program_id: Pubkey,
    pub target_orders: Pubkey,
}

pub fn decode_pool_state(data: &[u8]) -> Result<PoolState, DecodeError> {
    use liquidity_v4::*;
    let r = decode(&LAYOUT, data)?;
    Ok(PoolState {
        status: r.u64(STATUS),
        nonce: r.u64(NONCE),
        base_decimal: r.u64(BASE_DECIMAL),
        quote_decimal: r.u64(QUOTE_DECIMAL),
        base_need_take_pnl: r.u64(BASE_NEED_TAKE_PNL),
        quote_need_take_pnl: r.u64(QUOTE_NEED_TAKE_PNL),
        base_vault: r.pubkey(BASE_VAULT),
        quote_vault: r.pubkey(QUOTE_VAULT),
        base_mint: r.pubkey(BASE_MINT),
        quote_mint: r.pubkey(QUOTE_MINT),
        lp_mint: r.pubkey(LP_MINT),
        open_orders: r.pubkey(OPEN_ORDERS),
        market_id: r.pubkey(MARKET_ID),
        market_program_id: r.pubkey(MARKET_PROGRAM_ID),
        target_orders: r.pubkey(TARGET_ORDERS),
    })
}

/// Decoded OpenBook v3 market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketState {
    pub own_address: Pubkey,
    pub vault_signer_nonce: u64,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
}

pub fn decode_market_state(data: &[u8]) -> Result<MarketState, DecodeError> {
    use market_v3::*;
    let r = decode(&LAYOUT, data)?;
    Ok(MarketState {
        own_address: r.pubkey(OWN_ADDRESS),
        vault_signer_nonce: r.u64(VAULT_SIGNER_NONCE),
        base_mint: r.pubkey(BASE_MINT),
        quote_mint: r.pubkey(QUOTE_MINT),
        base_vault: r.pubkey(BASE_VAULT),
        quote_vault: r.pubkey(QUOTE_VAULT),
        event_queue: r.pubkey(EVENT_QUEUE),
        bids: r.pubkey(BIDS),
        asks: r.pubkey(ASKS),
    })
}

/// Reads the balance of an SPL token account.
pub fn decode_token_amount(data: &[u8]) -> Result<u64, DecodeError> {
    let r = decode(&token_account::LAYOUT, data)?;
    Ok(r.u64(token_account::AMOUNT))
}
