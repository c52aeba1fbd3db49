use std::sync::Arc;

use axum::{ routing::get, Router };
use tower::ServiceBuilder;
use tower_http::{ cors::CorsLayer, trace::TraceLayer };

pub mod balance;
pub mod chains;

use crate::config::NetworkConfig;
use crate::enums::NetworkMode;
use crate::services::MultiChainBalanceClient;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<MultiChainBalanceClient>,
    pub networks: Arc<NetworkConfig>,
    pub network_mode: NetworkMode,
}

impl AppState {
    pub fn new(
        client: Arc<MultiChainBalanceClient>,
        networks: Arc<NetworkConfig>,
        network_mode: NetworkMode
    ) -> Self {
        Self {
            client,
            networks,
            network_mode,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/chains", get(chains::list_chains))
        .route("/api/chains/{chain}/status", get(chains::chain_status))
        .route("/api/balance/{chain}/{address}", get(balance::get_balance))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
}

async fn health_check() -> &'static str {
    "OK"
}
