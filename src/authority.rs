//! Market vault-signer derivation.

use crate::error::DerivationError;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

/// Derives the OpenBook market's vault signer from the seed tuple
/// `[market address, vault_signer_nonce as 8 LE bytes]` under `market_program`.
///
/// The nonce is read from chain state and used as is. If the seeds land on the
/// curve there is no address to return; we report it instead of searching for
/// another nonce.
pub fn derive_market_authority(
    market: &Pubkey,
    vault_signer_nonce: u64,
    market_program: &Pubkey,
) -> Result<Pubkey, DerivationError> {
    let nonce = vault_signer_nonce.to_le_bytes();
    let authority = Pubkey::create_program_address(&[market.as_ref(), &nonce], market_program)
        .map_err(|e| DerivationError {
            market: *market,
            nonce: vault_signer_nonce,
            program: *market_program,
            reason: e.to_string(),
        })?;
    debug!("Market {market} vault signer {authority}");
    Ok(authority)
}
