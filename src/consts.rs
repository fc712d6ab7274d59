//! Common constants used across the swap pipeline.

use solana_sdk::pubkey::Pubkey;

/// The Solana native token mint (wrapped SOL).
pub const SOL_MINT: Pubkey = Pubkey::from_str_const("So11111111111111111111111111111111111111112");

/// Decimals of the native asset.
pub const SOL_DECIMALS: u8 = 9;

/// Numerator for Raydium liquidity fee (25 / 10_000 = 0.25%).
pub const LIQUIDITY_FEES_NUMERATOR: u64 = 25;

/// Denominator for Raydium liquidity fee.
pub const LIQUIDITY_FEES_DENOMINATOR: u64 = 10000;

/// Program ID for Raydium AMM V4 on mainnet.
pub const AMM_V4: Pubkey = Pubkey::from_str_const("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8");

/// Program ID for the OpenBook market program on mainnet.
pub const OPENBOOK_MARKET: Pubkey =
    Pubkey::from_str_const("srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX");

/// Program ID for Raydium AMM V4 on devnet.
pub const AMM_V4_DEVNET: Pubkey =
    Pubkey::from_str_const("HWy1jotHpo6UqeQxx49dpYYdQB8wj9Qk9MdxwjLvDHB8");

/// Program ID for the OpenBook market program on devnet.
pub const OPENBOOK_MARKET_DEVNET: Pubkey =
    Pubkey::from_str_const("EoTcMgcDRTJVZDMZWBoU6rhYHZfkNTVEAfz3uMwVjkj");

/// Raydium v4 liquidity pool authority.
pub const AMM_V4_AUTHORITY: Pubkey =
    Pubkey::from_str_const("5Q544fKrFoe6tsEbD7S8EmxGTJYAKtTVhAW5Q5pge4j1");

/// Raydium v4 `SwapBaseIn` instruction tag.
pub const SWAP_BASE_IN_OPCODE: u8 = 9;

/// LP mint decimals for every v4 pool.
pub const LP_DECIMALS: u8 = 9;

/// Pool layout version supported by the instruction builder.
pub const POOL_VERSION: u8 = 4;
