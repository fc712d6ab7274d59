//! High-level client that runs one swap against a Raydium v4 pool end to end.

use crate::error::{NetworkError, QuoteError, SwapError, SwapResult};
use crate::instruction::{SwapLegs, resolve_swap_legs};
use crate::layout::{PoolState, decode_market_state, decode_pool_state, decode_token_amount};
use crate::network::NetworkContext;
use crate::pool_keys::{PoolKeys, PoolReserves, assemble_pool_keys};
use crate::quote::{Quote, UiAmount, compute_quote};
use crate::rpc::{ChainClient, RawAccount};
use crate::transaction::{compose_swap_transaction, create_token_accounts};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use tracing::{debug, info};

/// What to swap and where the proceeds go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub amm_id: Pubkey,
    pub output_mint: Pubkey,
    pub amount_in: UiAmount,
    pub slippage_percent: u64,
    /// Owner of the output token account.
    pub recipient: Pubkey,
    /// When set, the quote must spend this mint.
    pub input_mint: Option<Pubkey>,
}

/// A fully built, unsigned swap.
#[derive(Debug, Clone)]
pub struct PreparedSwap {
    pub pool_keys: PoolKeys,
    pub quote: Quote,
    pub legs: SwapLegs,
    pub transaction: Transaction,
}

/// Runs the decode → derive → quote → build → compose pipeline over a
/// [`ChainClient`]. The network context and signer are created once by the
/// caller and only borrowed here.
pub struct AmmSwapClient<'a, C> {
    rpc: &'a C,
    owner: &'a Keypair,
    network: &'a NetworkContext,
}

impl<'a, C: ChainClient> AmmSwapClient<'a, C> {
    pub fn new(rpc: &'a C, owner: &'a Keypair, network: &'a NetworkContext) -> Self {
        Self {
            rpc,
            owner,
            network,
        }
    }

    pub fn owner(&self) -> Pubkey {
        self.owner.pubkey()
    }

    pub fn network(&self) -> &NetworkContext {
        self.network
    }

    /// Wallet balance in lamports.
    pub async fn balance(&self) -> Result<u64, NetworkError> {
        self.rpc.get_balance(&self.owner.pubkey()).await
    }

    async fn require_account(&self, address: &Pubkey) -> Result<RawAccount, NetworkError> {
        self.rpc
            .get_account(address)
            .await?
            .ok_or(NetworkError::AccountNotFound { address: *address })
    }

    /// Fetches and decodes the pool and its market, then assembles the keys.
    pub async fn fetch_pool_keys(&self, amm_id: &Pubkey) -> SwapResult<(PoolKeys, PoolState)> {
        let amm_account = self.require_account(amm_id).await?;
        let pool = decode_pool_state(&amm_account.data)?;
        debug!("Pool state {:?}", pool);

        let market_account = self.require_account(&pool.market_id).await?;
        let market = decode_market_state(&market_account.data)?;
        debug!("Market state {:?}", market);

        let keys = assemble_pool_keys(amm_id, &pool, &market, self.network)?;
        Ok((keys, pool))
    }

    /// Retrieve on‑chain reserves for a decoded pool.
    pub async fn fetch_reserves(&self, pool: &PoolState) -> SwapResult<PoolReserves> {
        let base = self.require_account(&pool.base_vault).await?;
        let quote = self.require_account(&pool.quote_vault).await?;
        let reserves = PoolReserves::from_vaults(
            pool,
            decode_token_amount(&base.data)?,
            decode_token_amount(&quote.data)?,
        );
        debug!(
            "Reserves base {} quote {} (slot {})",
            reserves.base, reserves.quote, quote.slot
        );
        Ok(reserves)
    }

    /// Builds the unsigned transaction for `request` from fresh chain state.
    pub async fn prepare_swap(&self, request: &SwapRequest) -> SwapResult<PreparedSwap> {
        let (pool_keys, pool) = self.fetch_pool_keys(&request.amm_id).await?;
        let reserves = self.fetch_reserves(&pool).await?;
        let quote = compute_quote(
            &pool_keys,
            &reserves,
            &request.output_mint,
            &request.amount_in,
            request.slippage_percent,
        )?;
        if let Some(expected) = request.input_mint.filter(|mint| *mint != quote.token_in) {
            return Err(QuoteError::WrongInputMint {
                expected,
                actual: quote.token_in,
                pool: pool_keys.id,
            }
            .into());
        }
        info!(
            "Quote on {}: {} in, {} expected out, {} minimum out",
            pool_keys.id, quote.amount_in, quote.expected_amount_out, quote.min_amount_out
        );

        let payer = self.owner.pubkey();
        let legs = resolve_swap_legs(&quote, &payer, &request.recipient)?;
        let setup = create_token_accounts(&payer, &request.recipient, &quote);
        let transaction = compose_swap_transaction(&payer, &pool_keys, &quote, &legs, setup)?;

        Ok(PreparedSwap {
            pool_keys,
            quote,
            legs,
            transaction,
        })
    }

    /// Prepares, signs and broadcasts the swap.
    pub async fn swap(&self, request: &SwapRequest) -> SwapResult<Signature> {
        let PreparedSwap {
            legs,
            mut transaction,
            ..
        } = self.prepare_swap(request).await?;
        info!(
            "Executing swap from {} to {}",
            legs.input_account, legs.output_account
        );

        let recent_blockhash = self.rpc.get_latest_blockhash().await?;
        transaction
            .try_sign(&[self.owner], recent_blockhash)
            .map_err(|e| SwapError::Signing(e.to_string()))?;

        let sig = self.rpc.send_and_confirm(&transaction).await?;
        info!("Executed with Signature {sig}");
        info!(
            "Explorer URL: {}",
            self.network.cluster.explorer_tx_url(&sig.to_string())
        );
        Ok(sig)
    }
}
