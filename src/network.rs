//! Cluster selection and the program-ID set that goes with it.

use crate::consts::{
    AMM_V4, AMM_V4_AUTHORITY, AMM_V4_DEVNET, OPENBOOK_MARKET, OPENBOOK_MARKET_DEVNET,
};
use crate::error::ConfigError;
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cluster {
    MainnetBeta,
    Testnet,
    #[default]
    Devnet,
}

impl Cluster {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Testnet => "testnet",
            Cluster::Devnet => "devnet",
        }
    }

    /// Public RPC endpoint for the cluster.
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
        }
    }

    /// Raydium deploys a separate program set on devnet only; every other
    /// cluster uses the mainnet addresses.
    pub fn program_ids(&self) -> ProgramIds {
        match self {
            Cluster::Devnet => ProgramIds::DEVNET,
            Cluster::MainnetBeta | Cluster::Testnet => ProgramIds::MAINNET,
        }
    }

    pub fn explorer_tx_url(&self, signature: &str) -> String {
        match self {
            Cluster::MainnetBeta => format!("https://solscan.io/tx/{signature}"),
            other => format!("https://solscan.io/tx/{signature}?cluster={}", other.as_str()),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cluster {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "testnet" => Ok(Cluster::Testnet),
            "devnet" => Ok(Cluster::Devnet),
            other => Err(ConfigError::Invalid {
                name: "RPC_CLUSTER",
                reason: format!("unknown cluster {other:?}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramIds {
    pub amm: Pubkey,
    pub amm_authority: Pubkey,
    pub market: Pubkey,
}

impl ProgramIds {
    pub const MAINNET: ProgramIds = ProgramIds {
        amm: AMM_V4,
        amm_authority: AMM_V4_AUTHORITY,
        market: OPENBOOK_MARKET,
    };

    pub const DEVNET: ProgramIds = ProgramIds {
        amm: AMM_V4_DEVNET,
        amm_authority: AMM_V4_AUTHORITY,
        market: OPENBOOK_MARKET_DEVNET,
    };
}

/// Resolved once at startup and passed by reference afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    pub cluster: Cluster,
    pub rpc_url: String,
    pub programs: ProgramIds,
}

impl NetworkContext {
    pub fn new(cluster: Cluster, rpc_url: Option<String>) -> Self {
        Self {
            cluster,
            rpc_url: rpc_url.unwrap_or_else(|| cluster.rpc_url().to_string()),
            programs: cluster.program_ids(),
        }
    }
}
