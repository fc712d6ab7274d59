//! The network seam: everything the pipeline needs from a Solana RPC node.

use crate::error::NetworkError;
use crate::shutdown::Shutdown;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Account bytes as returned by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccount {
    pub data: Vec<u8>,
    pub owner: Pubkey,
    pub slot: u64,
}

/// One request at a time; the caller awaits each before issuing the next.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// `Ok(None)` when the account does not exist.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<RawAccount>, NetworkError>;

    /// Balance in lamports.
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, NetworkError>;

    async fn get_latest_blockhash(&self) -> Result<Hash, NetworkError>;

    /// Broadcasts a signed transaction and waits for confirmation.
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, NetworkError>;
}

/// Runs `fut` until it resolves, `timeout` elapses or `shutdown` fires.
pub async fn confirm_within<T>(
    fut: impl Future<Output = Result<T, NetworkError>>,
    timeout: Duration,
    shutdown: &Shutdown,
) -> Result<T, NetworkError> {
    let mut shutdown = shutdown.clone();
    tokio::select! {
        res = fut => res,
        _ = tokio::time::sleep(timeout) => Err(NetworkError::Timeout { after: timeout }),
        _ = shutdown.cancelled() => Err(NetworkError::Cancelled),
    }
}

/// [`ChainClient`] over the nonblocking JSON-RPC client.
pub struct SolanaRpc {
    rpc_client: RpcClient,
    confirm_timeout: Duration,
    shutdown: Shutdown,
}

impl SolanaRpc {
    pub fn new(rpc_url: String, confirm_timeout: Duration, shutdown: Shutdown) -> Self {
        Self {
            rpc_client: RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed()),
            confirm_timeout,
            shutdown,
        }
    }
}

impl ChainClient for SolanaRpc {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<RawAccount>, NetworkError> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .map_err(|e| NetworkError::rpc(format!("getAccountInfo {address}"), e))?;
        let slot = response.context.slot;
        Ok(response.value.map(|account| RawAccount {
            data: account.data,
            owner: account.owner,
            slot,
        }))
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, NetworkError> {
        self.rpc_client
            .get_balance(address)
            .await
            .map_err(|e| NetworkError::rpc(format!("getBalance {address}"), e))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, NetworkError> {
        self.rpc_client
            .get_latest_blockhash()
            .await
            .map_err(|e| NetworkError::rpc("getLatestBlockhash", e))
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, NetworkError> {
        debug!(
            "Sending transaction with {} instructions",
            transaction.message.instructions.len()
        );
        let send = async {
            self.rpc_client
                .send_and_confirm_transaction(transaction)
                .await
                .map_err(|e| NetworkError::rpc("sendAndConfirmTransaction", e))
        };
        confirm_within(send, self.confirm_timeout, &self.shutdown).await
    }
}
