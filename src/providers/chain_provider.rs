use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use crate::enums::Chain;
use crate::error::{ AppError, Result };

/// A validated (chain, address) pair. Only `new` builds one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceRequest {
    pub(crate) chain: Chain,
    pub(crate) address: String,
}

impl BalanceRequest {
    /// Reject a missing address before any request is built.
    pub fn new(chain: Chain, address: &str) -> Result<Self> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AppError::Validation("Address is required".to_string()));
        }

        Ok(Self {
            chain,
            address: address.to_string(),
        })
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Native balance of one address, in whole coins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub chain: Chain,
    pub address: String,
    pub balance: f64,
    pub symbol: String,
    pub fetched_at: DateTime<Utc>,
}

impl BalanceResult {
    pub fn new(request: BalanceRequest, balance: f64) -> Self {
        Self {
            chain: request.chain,
            symbol: request.chain.native_symbol().to_string(),
            address: request.address,
            balance,
            fetched_at: Utc::now(),
        }
    }

    /// Balance rendered with eight decimals.
    pub fn formatted(&self) -> String {
        format!("{:.8}", self.balance)
    }
}

/// Capability set every chain backend implements.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    fn chain(&self) -> Chain;

    /// Lightweight liveness probe against the configured endpoint.
    async fn connect(&self) -> Result<bool>;

    /// Native balance of `address`. One request, no retries.
    async fn get_balance(&self, address: &str) -> Result<BalanceResult>;
}
