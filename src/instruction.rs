//! Raydium AMM v4 `SwapBaseIn` instruction.

use crate::consts::{SOL_MINT, SWAP_BASE_IN_OPCODE};
use crate::error::{SwapError, SwapResult};
use crate::pool_keys::PoolKeys;
use crate::quote::Quote;
use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

/// Wire payload: one tag byte followed by two little-endian u64s.
#[derive(BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapBaseIn {
    pub instruction: u8,
    pub amount_in: u64,
    pub minimum_amount_out: u64,
}

impl SwapBaseIn {
    pub const LEN: usize = 17;

    pub fn new(amount_in: u64, minimum_amount_out: u64) -> Self {
        Self {
            instruction: SWAP_BASE_IN_OPCODE,
            amount_in,
            minimum_amount_out,
        }
    }

    pub fn pack(&self) -> SwapResult<Vec<u8>> {
        let mut data = Vec::with_capacity(Self::LEN);
        self.serialize(&mut data)
            .map_err(|e| SwapError::Instruction(e.to_string()))?;
        Ok(data)
    }
}

/// Which side of the swap is wrapped SOL, and the token accounts for both legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapLegs {
    pub input_account: Pubkey,
    pub output_account: Pubkey,
    /// The input leg is wrapped SOL and has to be funded before the swap.
    pub wraps_input: bool,
}

/// Resolves the user token accounts for a quote.
///
/// The input account always belongs to `signer`, who must authorise the debit.
/// Output goes to `recipient`'s associated account for the bought mint.
pub fn resolve_swap_legs(
    quote: &Quote,
    signer: &Pubkey,
    recipient: &Pubkey,
) -> SwapResult<SwapLegs> {
    if quote.token_in == quote.token_out {
        return Err(SwapError::Instruction(format!(
            "input and output are both {}",
            quote.token_in
        )));
    }
    Ok(SwapLegs {
        input_account: get_associated_token_address(signer, &quote.token_in),
        output_account: get_associated_token_address(recipient, &quote.token_out),
        wraps_input: quote.token_in == SOL_MINT,
    })
}

/// Swap coin or pc from pool, base amount_in with a slippage of minimum_amount_out
///
///   0. `[]` Spl Token program id
///   1. `[writable]` AMM Account
///   2. `[]` AMM authority
///   3. `[writable]` AMM open orders Account
///   4. `[writable]` AMM coin vault Account to swap FROM or To.
///   5. `[writable]` AMM pc vault Account to swap FROM or To.
///   6. `[]` Market program id
///   7. `[writable]` Market Account. Market program is the owner.
///   8. `[writable]` Market bids Account
///   9. `[writable]` Market asks Account
///   10. `[writable]` Market event queue Account
///   11. `[writable]` Market coin vault Account
///   12. `[writable]` Market pc vault Account
///   13. `[]` Market vault signer Account
///   14. `[writable]` User source token Account.
///   15. `[writable]` User destination token Account.
///   16. `[signer]` User wallet Account
///
/// The order is the program's contract and does not depend on swap direction.
pub fn build_swap_instruction(
    pool_keys: &PoolKeys,
    quote: &Quote,
    input_token_account: &Pubkey,
    output_token_account: &Pubkey,
    signer: &Pubkey,
) -> SwapResult<Instruction> {
    let data = SwapBaseIn::new(quote.amount_in.raw, quote.min_amount_out).pack()?;

    let accounts = vec![
        // spl token
        AccountMeta::new_readonly(spl_token::id(), false),
        // amm
        AccountMeta::new(pool_keys.id, false),
        AccountMeta::new_readonly(pool_keys.authority, false),
        AccountMeta::new(pool_keys.open_orders, false),
        AccountMeta::new(pool_keys.base_vault, false),
        AccountMeta::new(pool_keys.quote_vault, false),
        // market
        AccountMeta::new_readonly(pool_keys.market_program_id, false),
        AccountMeta::new(pool_keys.market_id, false),
        AccountMeta::new(pool_keys.market_bids, false),
        AccountMeta::new(pool_keys.market_asks, false),
        AccountMeta::new(pool_keys.market_event_queue, false),
        AccountMeta::new(pool_keys.market_base_vault, false),
        AccountMeta::new(pool_keys.market_quote_vault, false),
        AccountMeta::new_readonly(pool_keys.market_authority, false),
        // user
        AccountMeta::new(*input_token_account, false),
        AccountMeta::new(*output_token_account, false),
        AccountMeta::new_readonly(*signer, true),
    ];

    Ok(Instruction {
        program_id: pool_keys.program_id,
        accounts,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{AMM_V4, OPENBOOK_MARKET};
    use crate::network::{Cluster, NetworkContext};
    use crate::pool_keys::{PoolReserves, assemble_pool_keys};
    use crate::quote::{UiAmount, compute_quote};
    use crate::testing::*;

    fn keys() -> PoolKeys {
        let pool = sample_pool_state();
        let mut market = sample_market_state(pool.market_id);
        market.vault_signer_nonce = valid_vault_signer_nonce(&market.own_address, &OPENBOOK_MARKET);
        let network = NetworkContext::new(Cluster::MainnetBeta, None);
        assemble_pool_keys(&unique_key(), &pool, &market, &network).unwrap()
    }

    fn quote_for(keys: &PoolKeys, output: &Pubkey) -> Quote {
        let reserves = PoolReserves {
            base: 1_000_000_000,
            quote: 2_000_000_000,
        };
        compute_quote(keys, &reserves, output, &"0.25".parse::<UiAmount>().unwrap(), 2).unwrap()
    }

    #[test]
    fn payload_is_exact() {
        let data = SwapBaseIn::new(1_000_000, 950_000).pack().unwrap();
        assert_eq!(
            data,
            vec![
                9, 0x40, 0x42, 0x0f, 0x00, 0, 0, 0, 0, 0xf0, 0x7e, 0x0e, 0x00, 0, 0, 0, 0
            ]
        );
        assert_eq!(&data[1..9], &1_000_000u64.to_le_bytes());
        assert_eq!(&data[9..], &950_000u64.to_le_bytes());
        assert_eq!(data.len(), SwapBaseIn::LEN);
    }

    #[test]
    fn account_order_is_fixed_in_both_directions() {
        let keys = keys();
        let signer = unique_key();
        let (source, destination) = (unique_key(), unique_key());
        for output in [keys.base_mint, keys.quote_mint] {
            let quote = quote_for(&keys, &output);
            let ix = build_swap_instruction(&keys, &quote, &source, &destination, &signer).unwrap();
            assert_eq!(ix.program_id, AMM_V4);
            assert_eq!(ix.accounts.len(), 17);

            let expected = [
                (spl_token::id(), false, false),
                (keys.id, false, true),
                (keys.authority, false, false),
                (keys.open_orders, false, true),
                (keys.base_vault, false, true),
                (keys.quote_vault, false, true),
                (keys.market_program_id, false, false),
                (keys.market_id, false, true),
                (keys.market_bids, false, true),
                (keys.market_asks, false, true),
                (keys.market_event_queue, false, true),
                (keys.market_base_vault, false, true),
                (keys.market_quote_vault, false, true),
                (keys.market_authority, false, false),
                (source, false, true),
                (destination, false, true),
                (signer, true, false),
            ];
            for (i, (meta, (key, is_signer, is_writable))) in
                ix.accounts.iter().zip(expected).enumerate()
            {
                assert_eq!(meta.pubkey, key, "account {i}");
                assert_eq!(meta.is_signer, is_signer, "signer flag {i}");
                assert_eq!(meta.is_writable, is_writable, "writable flag {i}");
            }

            let mut data = vec![SWAP_BASE_IN_OPCODE];
            data.extend_from_slice(&quote.amount_in.raw.to_le_bytes());
            data.extend_from_slice(&quote.min_amount_out.to_le_bytes());
            assert_eq!(ix.data, data);
        }
    }

    #[test]
    fn legs_follow_wrapped_side() {
        let keys = keys();
        let signer = unique_key();
        let recipient = unique_key();

        let buy = quote_for(&keys, &keys.base_mint);
        let legs = resolve_swap_legs(&buy, &signer, &recipient).unwrap();
        assert!(legs.wraps_input);
        assert_eq!(legs.input_account, get_associated_token_address(&signer, &SOL_MINT));
        assert_eq!(
            legs.output_account,
            get_associated_token_address(&recipient, &keys.base_mint)
        );

        let sell = quote_for(&keys, &keys.quote_mint);
        let legs = resolve_swap_legs(&sell, &signer, &recipient).unwrap();
        assert!(!legs.wraps_input);
        assert_eq!(
            legs.input_account,
            get_associated_token_address(&signer, &keys.base_mint)
        );
    }

    #[test]
    fn same_mint_on_both_legs_is_rejected() {
        let keys = keys();
        let mut quote = quote_for(&keys, &keys.base_mint);
        quote.token_in = quote.token_out;
        assert!(resolve_swap_legs(&quote, &unique_key(), &unique_key()).is_err());
    }
}
