//! Assembles the swap transaction: optional SOL wrap, then the swap.

use crate::error::{SwapError, SwapResult};
use crate::instruction::{SwapLegs, build_swap_instruction};
use crate::pool_keys::PoolKeys;
use crate::quote::Quote;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;
use solana_system_interface::instruction::transfer;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

/// Moves `lamports` into a wrapped SOL token account and syncs its token balance.
pub fn wrap_native_instructions(
    payer: &Pubkey,
    wsol_account: &Pubkey,
    lamports: u64,
) -> SwapResult<Vec<Instruction>> {
    Ok(vec![
        transfer(payer, wsol_account, lamports),
        spl_token::instruction::sync_native(&spl_token::id(), wsol_account)
            .map_err(|e| SwapError::Instruction(e.to_string()))?,
    ])
}

/// Idempotent associated-account creation for both legs.
pub fn create_token_accounts(
    payer: &Pubkey,
    recipient: &Pubkey,
    quote: &Quote,
) -> Vec<Instruction> {
    vec![
        create_associated_token_account_idempotent(payer, payer, &quote.token_in, &spl_token::id()),
        create_associated_token_account_idempotent(
            payer,
            recipient,
            &quote.token_out,
            &spl_token::id(),
        ),
    ]
}

/// Builds the unsigned swap transaction.
///
/// `setup` runs first (typically [`create_token_accounts`]). When the input leg
/// is wrapped SOL, exactly `amount_in` lamports are wrapped before the swap.
/// Wrapped SOL received on the output leg is left wrapped.
pub fn compose_swap_transaction(
    payer: &Pubkey,
    pool_keys: &PoolKeys,
    quote: &Quote,
    legs: &SwapLegs,
    setup: Vec<Instruction>,
) -> SwapResult<Transaction> {
    let swap_ix = build_swap_instruction(
        pool_keys,
        quote,
        &legs.input_account,
        &legs.output_account,
        payer,
    )?;

    let mut instructions = setup;
    if legs.wraps_input {
        instructions.extend(wrap_native_instructions(
            payer,
            &legs.input_account,
            quote.amount_in.raw,
        )?);
    }
    instructions.push(swap_ix);

    Ok(Transaction::new_with_payer(&instructions, Some(payer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::OPENBOOK_MARKET;
    use crate::instruction::resolve_swap_legs;
    use crate::network::{Cluster, NetworkContext};
    use crate::pool_keys::{PoolReserves, assemble_pool_keys};
    use crate::quote::{UiAmount, compute_quote};
    use crate::testing::*;

    fn fixture(buy_base: bool) -> (PoolKeys, Quote) {
        let pool = sample_pool_state();
        let mut market = sample_market_state(pool.market_id);
        market.vault_signer_nonce = valid_vault_signer_nonce(&market.own_address, &OPENBOOK_MARKET);
        let network = NetworkContext::new(Cluster::MainnetBeta, None);
        let keys = assemble_pool_keys(&unique_key(), &pool, &market, &network).unwrap();
        let reserves = PoolReserves {
            base: 1_000_000_000,
            quote: 2_000_000_000,
        };
        let output = if buy_base { keys.base_mint } else { keys.quote_mint };
        let amount: UiAmount = "0.3".parse().unwrap();
        let quote = compute_quote(&keys, &reserves, &output, &amount, 2).unwrap();
        (keys, quote)
    }

    fn program_ids(tx: &Transaction) -> Vec<Pubkey> {
        tx.message
            .instructions
            .iter()
            .map(|ix| tx.message.account_keys[ix.program_id_index as usize])
            .collect()
    }

    #[test]
    fn wrapped_input_is_funded_then_synced() {
        let payer = unique_key();
        let (keys, quote) = fixture(true);
        let legs = resolve_swap_legs(&quote, &payer, &payer).unwrap();
        let tx = compose_swap_transaction(&payer, &keys, &quote, &legs, Vec::new()).unwrap();

        assert_eq!(
            program_ids(&tx),
            vec![
                solana_system_interface::program::ID,
                spl_token::id(),
                keys.program_id
            ]
        );
        let transfer_ix = &tx.message.instructions[0];
        // SystemInstruction::Transfer is tag 2 followed by the lamports.
        assert_eq!(&transfer_ix.data[..4], &2u32.to_le_bytes());
        assert_eq!(&transfer_ix.data[4..], &quote.amount_in.raw.to_le_bytes());
        let destination = tx.message.account_keys[transfer_ix.accounts[1] as usize];
        assert_eq!(destination, legs.input_account);
        // SyncNative is tag 17.
        assert_eq!(tx.message.instructions[1].data, vec![17]);
        assert_eq!(tx.message.account_keys[0], payer);
    }

    #[test]
    fn unwrapped_input_only_swaps() {
        let payer = unique_key();
        let recipient = unique_key();
        let (keys, quote) = fixture(false);
        let legs = resolve_swap_legs(&quote, &payer, &recipient).unwrap();
        let tx = compose_swap_transaction(&payer, &keys, &quote, &legs, Vec::new()).unwrap();
        assert_eq!(program_ids(&tx), vec![keys.program_id]);
        assert_eq!(tx.message.instructions[0].data.len(), 17);
    }

    #[test]
    fn setup_runs_before_wrap_and_swap() {
        let payer = unique_key();
        let recipient = unique_key();
        let (keys, quote) = fixture(true);
        let legs = resolve_swap_legs(&quote, &payer, &recipient).unwrap();
        let setup = create_token_accounts(&payer, &recipient, &quote);
        let tx = compose_swap_transaction(&payer, &keys, &quote, &legs, setup).unwrap();
        let programs = program_ids(&tx);
        assert_eq!(programs.len(), 5);
        assert_eq!(programs[0], spl_associated_token_account::id());
        assert_eq!(programs[1], spl_associated_token_account::id());
        assert_eq!(programs[4], keys.program_id);
        assert!(tx.signatures.iter().all(|s| *s == Default::default()));
    }
}
