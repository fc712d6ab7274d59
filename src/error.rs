//! Error taxonomy for the swap pipeline.
//!
//! Each stage fails with its own error type; [`SwapError`] wraps all of them so
//! the pipeline can propagate with `?` up to the balance monitor.

use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use thiserror::Error;

/// An account buffer did not match its fixed layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{layout} is {expected} bytes, got {actual}")]
    SizeMismatch {
        layout: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// No program-derived address exists for the given seeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot derive market authority for {market} (nonce {nonce}) under {program}: {reason}")]
pub struct DerivationError {
    pub market: Pubkey,
    pub nonce: u64,
    pub program: Pubkey,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("insufficient liquidity in pool {pool}")]
    InsufficientLiquidity { pool: Pubkey },
    #[error("mint {mint} is not traded by pool {pool}")]
    MintNotInPool { mint: Pubkey, pool: Pubkey },
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),
    #[error("slippage must be within 0..=100 percent, got {0}")]
    InvalidSlippage(u64),
    #[error("pool {pool} would spend {actual}, expected {expected}")]
    WrongInputMint {
        expected: Pubkey,
        actual: Pubkey,
        pool: Pubkey,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("account {address} not found")]
    AccountNotFound { address: Pubkey },
    #[error("{context}: {message}")]
    Rpc { context: String, message: String },
    #[error("confirmation not reached after {after:?}")]
    Timeout { after: Duration },
    #[error("cancelled")]
    Cancelled,
}

impl NetworkError {
    pub fn rpc(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Rpc {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Any failure of a single swap attempt.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Derivation(#[from] DerivationError),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("failed to build instruction: {0}")]
    Instruction(String),
    #[error("failed to sign transaction: {0}")]
    Signing(String),
}

pub type SwapResult<T> = Result<T, SwapError>;
