//! Constant-product swap quotes.

use crate::consts::{LIQUIDITY_FEES_DENOMINATOR, LIQUIDITY_FEES_NUMERATOR};
use crate::error::QuoteError;
use crate::pool_keys::{PoolKeys, PoolReserves};
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A non-negative decimal amount as a user writes it (`"1.5"`), kept exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiAmount {
    whole: u128,
    fraction: String,
}

impl UiAmount {
    /// Renders a raw amount with `decimals` fractional digits.
    pub fn from_raw(raw: u64, decimals: u8) -> Self {
        let scale = 10u128.pow(decimals.min(38) as u32);
        let raw = raw as u128;
        let fraction = format!("{:0width$}", raw % scale, width = decimals as usize);
        Self {
            whole: raw / scale,
            fraction: fraction.trim_end_matches('0').to_string(),
        }
    }

    /// Scales to raw units, dropping digits past `decimals`.
    pub fn to_raw(&self, decimals: u8) -> Result<u64, QuoteError> {
        let overflow =
            || QuoteError::InvalidAmount(format!("{self} does not fit {decimals} decimals"));
        let scale = 10u128.checked_pow(decimals as u32).ok_or_else(overflow)?;
        let mut fraction = 0u128;
        for (i, digit) in self.fraction.bytes().take(decimals as usize).enumerate() {
            let place = 10u128.pow(decimals as u32 - 1 - i as u32);
            fraction += (digit - b'0') as u128 * place;
        }
        let raw = self
            .whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(fraction))
            .ok_or_else(overflow)?;
        u64::try_from(raw).map_err(|_| overflow())
    }
}

impl FromStr for UiAmount {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || QuoteError::InvalidAmount(s.to_string());
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }
        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<u128>().map_err(|_| invalid())?
        };
        Ok(Self {
            whole,
            fraction: fraction.trim_end_matches('0').to_string(),
        })
    }
}

impl fmt::Display for UiAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fraction.is_empty() {
            write!(f, "{}", self.whole)
        } else {
            write!(f, "{}.{}", self.whole, self.fraction)
        }
    }
}

/// A raw token amount tagged with its mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    pub mint: Pubkey,
    pub decimals: u8,
    pub raw: u64,
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", UiAmount::from_raw(self.raw, self.decimals), self.mint)
    }
}

/// The result of computing a swap quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub amount_in: TokenAmount,
    pub token_in: Pubkey,
    pub token_out: Pubkey,
    /// Raw amount out before slippage.
    pub expected_amount_out: u64,
    /// Minimum amount out after slippage tolerance.
    pub min_amount_out: u64,
    /// Fee deducted from the input.
    pub fee: u64,
    /// Percent price impact of this trade.
    pub price_impact: f64,
}

/// Fee charged on `amount_in`, rounded up.
pub fn swap_fee(amount_in: u64) -> u64 {
    ((amount_in as u128 * LIQUIDITY_FEES_NUMERATOR as u128)
        .div_ceil(LIQUIDITY_FEES_DENOMINATOR as u128)) as u64
}

/// Output of a constant-product swap after the fee, or `None` if the pool
/// cannot pay anything out.
pub fn constant_product_out(reserve_in: u64, reserve_out: u64, amount_in: u64) -> Option<u64> {
    if reserve_in == 0 || reserve_out == 0 {
        return None;
    }
    let after_fee = (amount_in - swap_fee(amount_in)) as u128;
    let out = reserve_out as u128 * after_fee / (reserve_in as u128 + after_fee);
    // out < reserve_out always holds, so it fits back into u64.
    (out > 0).then_some(out as u64)
}

/// Quotes selling into `pool_keys` to receive `output_mint`.
///
/// `amount_in` is in human units of the input token and is truncated to its
/// decimals.
pub fn compute_quote(
    pool_keys: &PoolKeys,
    reserves: &PoolReserves,
    output_mint: &Pubkey,
    amount_in: &UiAmount,
    slippage_percent: u64,
) -> Result<Quote, QuoteError> {
    if slippage_percent > 100 {
        return Err(QuoteError::InvalidSlippage(slippage_percent));
    }
    let pool = pool_keys.id;
    let (token_in, decimals_in, decimals_out, reserve_in, reserve_out) =
        if *output_mint == pool_keys.base_mint {
            (
                pool_keys.quote_mint,
                pool_keys.quote_decimals,
                pool_keys.base_decimals,
                reserves.quote,
                reserves.base,
            )
        } else if *output_mint == pool_keys.quote_mint {
            (
                pool_keys.base_mint,
                pool_keys.base_decimals,
                pool_keys.quote_decimals,
                reserves.base,
                reserves.quote,
            )
        } else {
            return Err(QuoteError::MintNotInPool {
                mint: *output_mint,
                pool,
            });
        };

    // An amount below one raw unit quotes zero out and fails as no liquidity.
    let raw_in = amount_in.to_raw(decimals_in)?;
    debug!("Reserve in: {reserve_in}, reserve out: {reserve_out}, amount in: {raw_in}");

    let expected_amount_out = constant_product_out(reserve_in, reserve_out, raw_in)
        .ok_or(QuoteError::InsufficientLiquidity { pool })?;
    // Never above expected_amount_out, so it fits in u64.
    let min_amount_out =
        (expected_amount_out as u128 * (100 - slippage_percent) as u128 / 100) as u64;
    let fee = swap_fee(raw_in);

    let current_price = reserve_out as f64 / reserve_in as f64;
    let execution_price = expected_amount_out as f64 / (raw_in - fee) as f64;
    let price_impact = (current_price - execution_price) / current_price * 100.0;
    debug!("Price impact {price_impact}, out scaled by 10^{decimals_out}");

    Ok(Quote {
        amount_in: TokenAmount {
            mint: token_in,
            decimals: decimals_in,
            raw: raw_in,
        },
        token_in,
        token_out: *output_mint,
        expected_amount_out,
        min_amount_out,
        fee,
        price_impact,
    })
}
