use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ─── Chain ───────────────────────────────────────────────────────────

/// Supported blockchain networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Bitcoin,
    Ethereum,
    Solana,
}

impl Chain {
    /// Canonical lowercase identifier, as used in URLs and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "bitcoin",
            Chain::Ethereum => "ethereum",
            Chain::Solana => "solana",
        }
    }

    /// Native token symbol for the chain.
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "BTC",
            Chain::Ethereum => "ETH",
            Chain::Solana => "SOL",
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Chain::Bitcoin => 8,
            Chain::Ethereum => 18,
            Chain::Solana => 9,
        }
    }

    /// Smallest units (satoshi / wei / lamport) per whole coin.
    pub fn units_per_coin(&self) -> f64 {
        match self {
            Chain::Bitcoin => 100_000_000.0,
            Chain::Ethereum => 1e18,
            Chain::Solana => 1e9,
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "Bitcoin",
            Chain::Ethereum => "Ethereum",
            Chain::Solana => "Solana",
        }
    }

    /// Network name the chain's endpoints are keyed under for a mode.
    pub fn network_name(&self, mode: NetworkMode) -> &'static str {
        match (self, mode) {
            (Chain::Bitcoin, NetworkMode::Mainnet) => "mainnet",
            (Chain::Bitcoin, NetworkMode::Testnet) => "testnet",
            (Chain::Ethereum, NetworkMode::Mainnet) => "mainnet",
            (Chain::Ethereum, NetworkMode::Testnet) => "sepolia",
            (Chain::Solana, NetworkMode::Mainnet) => "mainnet-beta",
            (Chain::Solana, NetworkMode::Testnet) => "devnet",
        }
    }

    /// Every network name the config loader looks for.
    pub fn known_networks(&self) -> &'static [&'static str] {
        match self {
            Chain::Bitcoin => &["mainnet", "testnet", "signet"],
            Chain::Ethereum => &["mainnet", "sepolia", "holesky"],
            Chain::Solana => &["mainnet-beta", "devnet", "testnet"],
        }
    }

    /// Convert an amount in the smallest unit into whole coins.
    pub fn to_display_units(&self, raw: u128) -> f64 {
        (raw as f64) / self.units_per_coin()
    }

    pub fn all() -> &'static [Chain] {
        &[Chain::Bitcoin, Chain::Ethereum, Chain::Solana]
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(Chain::Bitcoin),
            "ethereum" | "eth" => Ok(Chain::Ethereum),
            "solana" | "sol" => Ok(Chain::Solana),
            _ => Err(AppError::UnsupportedChain(s.to_string())),
        }
    }
}

// ─── NetworkMode ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    #[default]
    Mainnet,
    Testnet,
}

impl NetworkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkMode::Mainnet => "mainnet",
            NetworkMode::Testnet => "testnet",
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(NetworkMode::Mainnet),
            "testnet" => Ok(NetworkMode::Testnet),
            _ => Err(AppError::Config(format!(
                "NETWORK_MODE must be 'testnet' or 'mainnet', got '{}'",
                s
            ))),
        }
    }
}
