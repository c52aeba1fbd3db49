use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::chains::{ BitcoinProvider, EthereumProvider, SolanaProvider };
use crate::config::{ Config, NetworkConfig };
use crate::enums::{ Chain, NetworkMode };
use crate::error::{ AppError, Result };
use crate::providers::{ BalanceRequest, BalanceResult, ChainProvider };
use crate::rpc::build_http_client;

/// Dispatches balance and liveness calls to the provider for a chain.
///
/// Holds one immutable provider per configured chain. Calls are
/// independent; the client keeps no per-call state and never retries.
pub struct MultiChainBalanceClient {
    providers: HashMap<Chain, Arc<dyn ChainProvider>>,
}

impl MultiChainBalanceClient {
    /// Build providers for every chain that has an endpoint on the
    /// network selected by `mode`. Chains without one are left out and
    /// fail with a config error when called.
    pub fn new(networks: &NetworkConfig, mode: NetworkMode, timeout: Option<Duration>) -> Result<Self> {
        let client = build_http_client(timeout)?;
        let mut providers: HashMap<Chain, Arc<dyn ChainProvider>> = HashMap::new();

        for &chain in Chain::all() {
            let url = match networks.resolve(chain, chain.network_name(mode)) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", chain.display_name(), e);
                    continue;
                }
            };

            let provider: Arc<dyn ChainProvider> = match chain {
                Chain::Bitcoin => Arc::new(BitcoinProvider::new(client.clone(), url)),
                Chain::Ethereum => Arc::new(EthereumProvider::new(client.clone(), url)),
                Chain::Solana => Arc::new(SolanaProvider::new(client.clone(), url)),
            };
            tracing::info!("{} provider configured for {}", chain.display_name(), chain.network_name(mode));
            providers.insert(chain, provider);
        }

        Ok(Self { providers })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.networks, config.network_mode, config.request_timeout)
    }

    /// Use caller-supplied providers; a later provider for the same chain
    /// replaces an earlier one.
    pub fn from_providers<I>(providers: I) -> Self where I: IntoIterator<Item = Arc<dyn ChainProvider>> {
        Self {
            providers: providers
                .into_iter()
                .map(|p| (p.chain(), p))
                .collect(),
        }
    }

    /// Chains with a provider, in `Chain::all()` order.
    pub fn supported_chains(&self) -> Vec<Chain> {
        Chain::all()
            .iter()
            .copied()
            .filter(|c| self.providers.contains_key(c))
            .collect()
    }

    fn provider(&self, chain: Chain) -> Result<&Arc<dyn ChainProvider>> {
        self.providers
            .get(&chain)
            .ok_or_else(|| {
                AppError::Config(format!("No endpoint configured for {}", chain.display_name()))
            })
    }

    /// Liveness probe for a chain given by name (case-insensitive).
    pub async fn initialize_chain(&self, chain: &str) -> Result<bool> {
        let chain: Chain = chain.parse()?;
        self.initialize(chain).await
    }

    pub async fn initialize(&self, chain: Chain) -> Result<bool> {
        tracing::info!("Initializing {} connection...", chain.display_name());
        self.provider(chain)?.connect().await
    }

    /// Balance of `address` on a chain given by name (case-insensitive).
    pub async fn get_balance(&self, chain: &str, address: &str) -> Result<BalanceResult> {
        let chain: Chain = chain.parse()?;
        self.balance(chain, address).await
    }

    pub async fn balance(&self, chain: Chain, address: &str) -> Result<BalanceResult> {
        let request = BalanceRequest::new(chain, address)?;
        let provider = self.provider(chain)?;

        match provider.get_balance(&request.address).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!("{} balance error: {}", chain.display_name(), e);
                Err(e)
            }
        }
    }

    /// Probe the chain, then fetch the balance. This is what every
    /// refresh runs, so a dead endpoint reports as a connection failure.
    pub async fn check_balance(&self, chain: &str, address: &str) -> Result<BalanceResult> {
        let chain: Chain = chain.parse()?;
        self.refresh(chain, address).await
    }

    pub async fn refresh(&self, chain: Chain, address: &str) -> Result<BalanceResult> {
        let request = BalanceRequest::new(chain, address)?;
        self.initialize(chain).await?;
        self.balance(chain, &request.address).await
    }
}
