use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{ json, Value };

use crate::enums::Chain;
use crate::error::{ AppError, Result };
use crate::providers::{ BalanceRequest, BalanceResult, ChainProvider };
use crate::rpc::JsonRpcClient;

const INVALID_ADDRESS: &str = "Invalid Solana address";

#[derive(Clone)]
pub struct SolanaProvider {
    rpc: JsonRpcClient,
}

// ── Solana JSON-RPC response types ──────────────────────────────────

#[derive(Debug, Deserialize)]
struct GetBalanceResult {
    value: u64,
}

impl SolanaProvider {
    pub fn new(client: reqwest::Client, rpc_url: &str) -> Self {
        Self {
            rpc: JsonRpcClient::new(client, rpc_url, Chain::Solana),
        }
    }
}

#[async_trait]
impl ChainProvider for SolanaProvider {
    fn chain(&self) -> Chain {
        Chain::Solana
    }

    async fn connect(&self) -> Result<bool> {
        match self.rpc.call::<Value>("getHealth", None).await {
            Ok(resp) if !resp.has_error() => Ok(true),
            Ok(resp) => {
                tracing::warn!(
                    "Solana node reported unhealthy: {}",
                    resp.error_message().unwrap_or_default()
                );
                Err(AppError::Connection { chain: Chain::Solana })
            }
            Err(e) => {
                tracing::warn!("Solana connection error: {}", e);
                Err(AppError::Connection { chain: Chain::Solana })
            }
        }
    }

    async fn get_balance(&self, address: &str) -> Result<BalanceResult> {
        let request = BalanceRequest::new(Chain::Solana, address)?;

        let result: GetBalanceResult = self.rpc
            .call("getBalance", Some(json!([request.address]))).await?
            .into_result(Chain::Solana, INVALID_ADDRESS)?;

        Ok(BalanceResult::new(request, Chain::Solana.to_display_units(result.value as u128)))
    }
}
