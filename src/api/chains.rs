use axum::{ extract::{ Path, State }, Json };
use serde::Serialize;

use crate::enums::Chain;
use crate::error::Result;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct ChainInfo {
    pub chain: Chain,
    pub name: &'static str,
    pub network: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChainStatus {
    pub chain: Chain,
    pub connected: bool,
}

pub async fn list_chains(State(state): State<AppState>) -> Json<Vec<ChainInfo>> {
    let chains = state.client
        .supported_chains()
        .into_iter()
        .map(|chain| {
            let network = chain.network_name(state.network_mode);
            ChainInfo {
                chain,
                name: chain.display_name(),
                network,
                symbol: chain.native_symbol(),
                decimals: chain.decimals(),
                example_address: state.networks.example_address(chain, network).map(str::to_string),
            }
        })
        .collect();

    Json(chains)
}

pub async fn chain_status(
    State(state): State<AppState>,
    Path(chain): Path<String>
) -> Result<Json<ChainStatus>> {
    let chain: Chain = chain.parse()?;
    let connected = state.client.initialize(chain).await?;

    Ok(Json(ChainStatus { chain, connected }))
}
