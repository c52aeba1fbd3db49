use async_trait::async_trait;
use serde_json::{ json, Value };

use crate::enums::Chain;
use crate::error::{ AppError, Result };
use crate::providers::{ BalanceRequest, BalanceResult, ChainProvider };
use crate::rpc::JsonRpcClient;

#[derive(Clone)]
pub struct EthereumProvider {
    rpc: JsonRpcClient,
}

impl EthereumProvider {
    pub fn new(client: reqwest::Client, rpc_url: &str) -> Self {
        Self {
            rpc: JsonRpcClient::new(client, rpc_url, Chain::Ethereum),
        }
    }

    /// Parse an `eth_getBalance` quantity ("0x..." hex) into wei.
    fn parse_wei(quantity: &str) -> Result<u128> {
        let digits = quantity
            .trim()
            .trim_start_matches("0x")
            .trim_start_matches("0X");
        if digits.is_empty() {
            return Err(AppError::fetch(Chain::Ethereum, format!("Empty balance quantity '{}'", quantity)));
        }

        u128::from_str_radix(digits, 16).map_err(|e|
            AppError::fetch(Chain::Ethereum, format!("Invalid balance quantity '{}': {}", quantity, e))
        )
    }
}

#[async_trait]
impl ChainProvider for EthereumProvider {
    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    async fn connect(&self) -> Result<bool> {
        match self.rpc.call::<Value>("eth_blockNumber", Some(json!([]))).await {
            Ok(resp) if !resp.has_error() => Ok(true),
            Ok(resp) => {
                tracing::warn!(
                    "Ethereum connection check returned an error: {}",
                    resp.error_message().unwrap_or_default()
                );
                Err(AppError::Connection { chain: Chain::Ethereum })
            }
            Err(e) => {
                tracing::warn!("Ethereum connection error: {}", e);
                Err(AppError::Connection { chain: Chain::Ethereum })
            }
        }
    }

    async fn get_balance(&self, address: &str) -> Result<BalanceResult> {
        let request = BalanceRequest::new(Chain::Ethereum, address)?;

        let quantity: String = self.rpc
            .call("eth_getBalance", Some(json!([request.address, "latest"]))).await?
            .into_result(Chain::Ethereum, "Invalid Ethereum address")?;

        let wei = Self::parse_wei(&quantity)?;

        Ok(BalanceResult::new(request, Chain::Ethereum.to_display_units(wei)))
    }
}
