//! Utility functions for environment parsing and keypair handling.

use crate::error::ConfigError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use std::str::FromStr;

/// Parses a comma-separated byte list (`"150, 12, 123, ..."`, brackets
/// optional) into a Solana `Keypair`.
///
/// # Examples
///
/// ```no_run
/// use raydium_threshold_swap::helpers::from_bytes_to_key_pair;
/// let kp = from_bytes_to_key_pair("[1,2,3,...]").unwrap();
/// ```
pub fn from_bytes_to_key_pair(env: &str) -> Result<Keypair, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "CREATOR_PRIVATE_KEY",
        reason,
    };
    let bytes = env
        .trim()
        .trim_matches(&['[', ']'][..])
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<u8>()
                .map_err(|_| invalid(format!("{:?} is not a byte", s.trim())))
        })
        .collect::<Result<Vec<u8>, _>>()?;
    Keypair::try_from(bytes.as_slice())
        .map_err(|_| invalid(format!("expected 64 key bytes, got {}", bytes.len())))
}

pub fn parse_pubkey(name: &'static str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim()).map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("{value:?}: {e}"),
    })
}
