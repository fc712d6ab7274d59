//! Shared fixtures for unit tests.

use crate::error::NetworkError;
use crate::layout::{Field, MarketState, PoolState, liquidity_v4, market_v3, token_account};
use crate::rpc::{ChainClient, RawAccount};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// A fresh address, distinct from every other one handed out in this process.
pub(crate) fn unique_key() -> Pubkey {
    let n = NEXT_KEY.fetch_add(1, Ordering::Relaxed);
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&n.to_le_bytes());
    bytes[31] = 0xA5;
    Pubkey::new_from_array(bytes)
}

pub(crate) fn put_u64(buf: &mut [u8], field: Field, value: u64) {
    buf[field.offset..field.end()].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_pubkey(buf: &mut [u8], field: Field, value: &Pubkey) {
    buf[field.offset..field.end()].copy_from_slice(&value.to_bytes());
}

pub(crate) fn encode_pool_state(state: &PoolState) -> Vec<u8> {
    use liquidity_v4::*;
    let mut buf = vec![0u8; LAYOUT.size];
    put_u64(&mut buf, STATUS, state.status);
    put_u64(&mut buf, NONCE, state.nonce);
    put_u64(&mut buf, BASE_DECIMAL, state.base_decimal);
    put_u64(&mut buf, QUOTE_DECIMAL, state.quote_decimal);
    put_u64(&mut buf, BASE_NEED_TAKE_PNL, state.base_need_take_pnl);
    put_u64(&mut buf, QUOTE_NEED_TAKE_PNL, state.quote_need_take_pnl);
    put_pubkey(&mut buf, BASE_VAULT, &state.base_vault);
    put_pubkey(&mut buf, QUOTE_VAULT, &state.quote_vault);
    put_pubkey(&mut buf, BASE_MINT, &state.base_mint);
    put_pubkey(&mut buf, QUOTE_MINT, &state.quote_mint);
    put_pubkey(&mut buf, LP_MINT, &state.lp_mint);
    put_pubkey(&mut buf, OPEN_ORDERS, &state.open_orders);
    put_pubkey(&mut buf, MARKET_ID, &state.market_id);
    put_pubkey(&mut buf, MARKET_PROGRAM_ID, &state.market_program_id);
    put_pubkey(&mut buf, TARGET_ORDERS, &state.target_orders);
    buf
}

pub(crate) fn encode_market_state(state: &MarketState) -> Vec<u8> {
    use market_v3::*;
    let mut buf = vec![0u8; LAYOUT.size];
    buf[..5].copy_from_slice(b"serum");
    put_pubkey(&mut buf, OWN_ADDRESS, &state.own_address);
    put_u64(&mut buf, VAULT_SIGNER_NONCE, state.vault_signer_nonce);
    put_pubkey(&mut buf, BASE_MINT, &state.base_mint);
    put_pubkey(&mut buf, QUOTE_MINT, &state.quote_mint);
    put_pubkey(&mut buf, BASE_VAULT, &state.base_vault);
    put_pubkey(&mut buf, QUOTE_VAULT, &state.quote_vault);
    put_pubkey(&mut buf, EVENT_QUEUE, &state.event_queue);
    put_pubkey(&mut buf, BIDS, &state.bids);
    put_pubkey(&mut buf, ASKS, &state.asks);
    buf
}

pub(crate) fn encode_token_account(mint: &Pubkey, owner: &Pubkey, amount: u64) -> Vec<u8> {
    let mut buf = vec![0u8; token_account::LAYOUT.size];
    put_pubkey(&mut buf, token_account::MINT, mint);
    put_pubkey(&mut buf, token_account::OWNER, owner);
    put_u64(&mut buf, token_account::AMOUNT, amount);
    buf
}

pub(crate) fn sample_pool_state() -> PoolState {
    PoolState {
        status: 6,
        nonce: 254,
        base_decimal: 6,
        quote_decimal: 9,
        base_need_take_pnl: 11,
        quote_need_take_pnl: 22,
        base_vault: unique_key(),
        quote_vault: unique_key(),
        base_mint: unique_key(),
        quote_mint: crate::consts::SOL_MINT,
        lp_mint: unique_key(),
        open_orders: unique_key(),
        market_id: unique_key(),
        market_program_id: crate::consts::OPENBOOK_MARKET,
        target_orders: unique_key(),
    }
}

pub(crate) fn sample_market_state(own_address: Pubkey) -> MarketState {
    MarketState {
        own_address,
        vault_signer_nonce: 0,
        base_mint: unique_key(),
        quote_mint: unique_key(),
        base_vault: unique_key(),
        quote_vault: unique_key(),
        event_queue: unique_key(),
        bids: unique_key(),
        asks: unique_key(),
    }
}

/// The first nonce that yields an off-curve vault signer for `market`, the same
/// search a market creator performs.
pub(crate) fn valid_vault_signer_nonce(market: &Pubkey, program: &Pubkey) -> u64 {
    (0u64..)
        .find(|nonce| {
            Pubkey::create_program_address(&[market.as_ref(), &nonce.to_le_bytes()], program)
                .is_ok()
        })
        .unwrap()
}

/// In-memory chain: accounts by address, a scripted balance sequence, and a
/// log of everything broadcast.
#[derive(Default)]
pub(crate) struct MockChain {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    balances: Mutex<VecDeque<Result<u64, NetworkError>>>,
    send_error: Mutex<Option<NetworkError>>,
    sent: Mutex<Vec<Transaction>>,
    calls: AtomicUsize,
}

impl MockChain {
    pub(crate) fn put_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(address, data);
    }

    pub(crate) fn push_balance(&self, balance: Result<u64, NetworkError>) {
        self.balances.lock().unwrap().push_back(balance);
    }

    pub(crate) fn fail_sends_with(&self, err: NetworkError) {
        *self.send_error.lock().unwrap() = Some(err);
    }

    pub(crate) fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of network round trips made so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl ChainClient for MockChain {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<RawAccount>, NetworkError> {
        self.record();
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(address)
            .map(|data| RawAccount {
                data: data.clone(),
                owner: Pubkey::default(),
                slot: 1,
            }))
    }

    async fn get_balance(&self, _address: &Pubkey) -> Result<u64, NetworkError> {
        self.record();
        self.balances.lock().unwrap().pop_front().unwrap_or(Ok(0))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, NetworkError> {
        self.record();
        Ok(Hash::new_from_array([7u8; 32]))
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, NetworkError> {
        self.record();
        if let Some(err) = self.send_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.sent.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures.first().copied().unwrap_or_default())
    }
}

/// A pool, its market and both vaults written into a [`MockChain`].
pub(crate) struct MockPool {
    pub(crate) amm_id: Pubkey,
    pub(crate) state: PoolState,
    pub(crate) market: MarketState,
}

impl MockPool {
    pub(crate) fn install(
        chain: &MockChain,
        market_program: &Pubkey,
        base_vault_amount: u64,
        quote_vault_amount: u64,
    ) -> Self {
        let amm_id = unique_key();
        let state = sample_pool_state();
        let mut market = sample_market_state(state.market_id);
        market.vault_signer_nonce = valid_vault_signer_nonce(&market.own_address, market_program);

        chain.put_account(amm_id, encode_pool_state(&state));
        chain.put_account(state.market_id, encode_market_state(&market));
        chain.put_account(
            state.base_vault,
            encode_token_account(&state.base_mint, &unique_key(), base_vault_amount),
        );
        chain.put_account(
            state.quote_vault,
            encode_token_account(&state.quote_mint, &unique_key(), quote_vault_amount),
        );
        Self {
            amm_id,
            state,
            market,
        }
    }
}
