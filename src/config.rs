use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::enums::{Chain, NetworkMode};
use crate::error::{AppError, Result};

/// One chain/network endpoint entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEndpoint {
    pub chain: Chain,
    pub network_name: String,
    pub endpoint_url: String,
    pub example_address: Option<String>,
}

/// Immutable chain × network → endpoint table.
///
/// Built once and handed to the client; nothing mutates it afterwards.
#[derive(Debug, Clone, Default)]
pub struct NetworkConfig {
    endpoints: HashMap<(Chain, String), NetworkEndpoint>,
}

impl NetworkConfig {
    pub fn builder() -> NetworkConfigBuilder {
        NetworkConfigBuilder::default()
    }

    /// Endpoint URL for a chain on a named network.
    pub fn resolve(&self, chain: Chain, network_name: &str) -> Result<&str> {
        self.endpoint(chain, network_name)
            .map(|e| e.endpoint_url.as_str())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "No endpoint configured for {} network '{}'",
                    chain.display_name(),
                    network_name
                ))
            })
    }

    pub fn endpoint(&self, chain: Chain, network_name: &str) -> Option<&NetworkEndpoint> {
        self.endpoints.get(&(chain, network_name.to_string()))
    }

    pub fn example_address(&self, chain: Chain, network_name: &str) -> Option<&str> {
        self.endpoint(chain, network_name).and_then(|e| e.example_address.as_deref())
    }

    /// Chains that have an endpoint for the given mode, in `Chain::all()` order.
    pub fn configured_chains(&self, mode: NetworkMode) -> Vec<Chain> {
        Chain::all()
            .iter()
            .copied()
            .filter(|c| self.endpoint(*c, c.network_name(mode)).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct NetworkConfigBuilder {
    endpoints: HashMap<(Chain, String), NetworkEndpoint>,
}

impl NetworkConfigBuilder {
    /// Register an endpoint. Empty URLs are ignored so that unset
    /// entries resolve to a config error instead of a bogus request.
    pub fn endpoint(mut self, chain: Chain, network_name: &str, url: &str) -> Self {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return self;
        }

        let key = (chain, network_name.to_string());
        let example_address = self.endpoints.get(&key).and_then(|e| e.example_address.clone());
        self.endpoints.insert(key, NetworkEndpoint {
            chain,
            network_name: network_name.to_string(),
            endpoint_url: url.to_string(),
            example_address,
        });
        self
    }

    /// Attach an example address to a previously registered endpoint.
    pub fn example_address(mut self, chain: Chain, network_name: &str, address: &str) -> Self {
        let address = address.trim();
        if let Some(entry) = self.endpoints.get_mut(&(chain, network_name.to_string())) {
            if !address.is_empty() {
                entry.example_address = Some(address.to_string());
            }
        }
        self
    }

    pub fn build(self) -> NetworkConfig {
        NetworkConfig { endpoints: self.endpoints }
    }
}

/// A `chain:address` pair the background watcher polls.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchTarget {
    pub chain: Chain,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub network_mode: NetworkMode,
    pub networks: NetworkConfig,
    pub request_timeout: Option<Duration>,
    pub server_host: String,
    pub server_port: u16,
    pub watch_targets: Vec<WatchTarget>,
    pub watch_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self> where F: Fn(&str) -> Option<String> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let network_mode = match var("NETWORK_MODE") {
            Some(mode) => mode.parse()?,
            None => NetworkMode::Mainnet,
        };

        let mut builder = NetworkConfig::builder();
        for &chain in Chain::all() {
            for &network in chain.known_networks() {
                let prefix = env_prefix(chain, network);
                if let Some(url) = var(&format!("{}_RPC_URL", prefix)) {
                    builder = builder.endpoint(chain, network, &url);
                    if let Some(addr) = var(&format!("{}_EXAMPLE_ADDRESS", prefix)) {
                        builder = builder.example_address(chain, network, &addr);
                    }
                }
            }
        }
        let networks = builder.build();

        if networks.configured_chains(network_mode).is_empty() {
            return Err(
                AppError::Config(
                    format!(
                        "No chain endpoints configured for {}. Set at least one *_RPC_URL env var for that network.",
                        network_mode
                    )
                )
            );
        }

        let request_timeout = var("REQUEST_TIMEOUT_SECS")
            .map(|v| parse_number::<u64>("REQUEST_TIMEOUT_SECS", &v))
            .transpose()?
            .map(Duration::from_secs);

        let server_host = var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = parse_number("SERVER_PORT", &var("SERVER_PORT").unwrap_or_else(|| "8080".to_string()))?;

        let watch_targets = match var("WATCH") {
            Some(raw) => Self::parse_watch_targets(&raw)?,
            None => Vec::new(),
        };

        let watch_interval_secs: u64 = parse_number(
            "WATCH_INTERVAL_SECS",
            &var("WATCH_INTERVAL_SECS").unwrap_or_else(|| "60".to_string())
        )?;
        if watch_interval_secs == 0 {
            return Err(AppError::Config("WATCH_INTERVAL_SECS must be greater than 0".to_string()));
        }

        Ok(Config {
            network_mode,
            networks,
            request_timeout,
            server_host,
            server_port,
            watch_targets,
            watch_interval: Duration::from_secs(watch_interval_secs),
        })
    }

    fn parse_watch_targets(raw: &str) -> Result<Vec<WatchTarget>> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|entry| -> Result<WatchTarget> {
                let (chain, address) = entry
                    .split_once(':')
                    .ok_or_else(|| {
                        AppError::Config(format!("WATCH entry '{}' must be chain:address", entry))
                    })?;
                let address = address.trim();
                if address.is_empty() {
                    return Err(AppError::Config(format!("WATCH entry '{}' has no address", entry)));
                }
                Ok(WatchTarget {
                    chain: chain.parse()?,
                    address: address.to_string(),
                })
            })
            .collect()
    }

    /// Network name selected for a chain by the current mode.
    pub fn network_name(&self, chain: Chain) -> &'static str {
        chain.network_name(self.network_mode)
    }

    pub fn configured_chains(&self) -> Vec<Chain> {
        self.networks.configured_chains(self.network_mode)
    }
}

fn env_prefix(chain: Chain, network: &str) -> String {
    format!("{}_{}", chain.as_str(), network).to_uppercase().replace('-', "_")
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", key, value)))
}
