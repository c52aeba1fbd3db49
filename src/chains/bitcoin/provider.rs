use async_trait::async_trait;
use serde::Deserialize;

use crate::enums::Chain;
use crate::error::{ AppError, Result };
use crate::providers::{ BalanceRequest, BalanceResult, ChainProvider };

/// Bitcoin balances over an Esplora-compatible REST API
/// (mempool.space, blockstream.info).
#[derive(Clone)]
pub struct BitcoinProvider {
    client: reqwest::Client,
    base_url: String,
}

// ── Esplora API response types ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EsploraUtxo {
    #[serde(default)]
    value: Option<u64>,
}

// ── Implementation ──────────────────────────────────────────────────

impl BitcoinProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_utxos(&self, address: &str) -> Result<Vec<EsploraUtxo>> {
        let url = format!("{}/address/{}/utxo", self.base_url, urlencoding::encode(address));
        tracing::debug!(chain = %Chain::Bitcoin, %url, "Esplora request");

        let resp = self.client
            .get(&url)
            .send().await
            .map_err(|e| AppError::fetch(Chain::Bitcoin, format!("Esplora request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(Chain::Bitcoin, format!("Esplora API error: {}", resp.status())));
        }

        resp.json().await.map_err(|e|
            AppError::fetch(Chain::Bitcoin, format!("Failed to parse UTXOs: {}", e))
        )
    }

    fn sum_satoshis(utxos: &[EsploraUtxo]) -> u128 {
        utxos
            .iter()
            .map(|u| u.value.unwrap_or(0) as u128)
            .sum()
    }
}

#[async_trait]
impl ChainProvider for BitcoinProvider {
    fn chain(&self) -> Chain {
        Chain::Bitcoin
    }

    async fn connect(&self) -> Result<bool> {
        let url = format!("{}/blocks/tip/height", self.base_url);

        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => Ok(true),
            Ok(resp) => {
                tracing::warn!("Bitcoin connection check returned {}", resp.status());
                Err(AppError::Connection { chain: Chain::Bitcoin })
            }
            Err(e) => {
                tracing::warn!("Bitcoin connection error: {}", e);
                Err(AppError::Connection { chain: Chain::Bitcoin })
            }
        }
    }

    async fn get_balance(&self, address: &str) -> Result<BalanceResult> {
        let request = BalanceRequest::new(Chain::Bitcoin, address)?;

        let utxos = self.get_utxos(&request.address).await?;
        let total_sats = Self::sum_satoshis(&utxos);

        Ok(BalanceResult::new(request, Chain::Bitcoin.to_display_units(total_sats)))
    }
}
