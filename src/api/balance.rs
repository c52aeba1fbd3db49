use axum::{ extract::{ Path, State }, Json };
use serde::Serialize;

use crate::error::Result;
use crate::providers::BalanceResult;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    #[serde(flatten)]
    pub result: BalanceResult,
    pub formatted: String,
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path((chain, address)): Path<(String, String)>
) -> Result<Json<BalanceResponse>> {
    let result = state.client.check_balance(&chain, &address).await?;

    Ok(
        Json(BalanceResponse {
            formatted: result.formatted(),
            result,
        })
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{ to_bytes, Body };
    use axum::http::{ Request, StatusCode };
    use serde_json::{ json, Value };
    use tower::ServiceExt;
    use wiremock::matchers::{ body_partial_json, method };
    use wiremock::{ Mock, MockServer, ResponseTemplate };

    use crate::api::{ router, AppState };
    use crate::config::NetworkConfig;
    use crate::enums::{ Chain, NetworkMode };
    use crate::services::MultiChainBalanceClient;

    async fn app(server: &MockServer) -> axum::Router {
        let networks = NetworkConfig::builder()
            .endpoint(Chain::Ethereum, "mainnet", &server.uri())
            .build();
        let client = MultiChainBalanceClient::new(&networks, NetworkMode::Mainnet, None).unwrap();
        router(AppState::new(Arc::new(client), Arc::new(networks), NetworkMode::Mainnet))
    }

    async fn mount_block_number(server: &MockServer) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_blockNumber"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": "0x13a5f1c"}))
            )
            .expect(1)
            .mount(server).await;
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_balance_route() {
        let server = MockServer::start().await;
        mount_block_number(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_getBalance", "params": ["0xabc", "latest"]})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": "0x6f05b59d3b20000"}))
            )
            .mount(&server).await;

        let (status, body) = get(app(&server).await, "/api/balance/ETH/0xabc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chain"], "ethereum");
        assert_eq!(body["balance"], 0.5);
        assert_eq!(body["formatted"], "0.50000000");
        assert_eq!(body["symbol"], "ETH");
    }

    #[tokio::test]
    async fn test_unsupported_chain_is_bad_request() {
        let server = MockServer::start().await;

        let (status, body) = get(app(&server).await, "/api/balance/dogecoin/DAbc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_CHAIN");
    }

    #[tokio::test]
    async fn test_rpc_error_is_bad_gateway() {
        let server = MockServer::start().await;
        mount_block_number(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_getBalance"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(
                    json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "invalid address"}})
                )
            )
            .mount(&server).await;

        let (status, body) = get(app(&server).await, "/api/balance/ethereum/0xabc").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "RPC_ERROR");
        assert_eq!(body["error"]["message"], "invalid address");
        assert_eq!(body["error"]["chain"], "ethereum");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_blockNumber"})))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_getBalance"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server).await;

        let (status, body) = get(app(&server).await, "/api/balance/ethereum/0xabc").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "CONNECTION_ERROR");
        assert_eq!(body["error"]["chain"], "ethereum");
    }
}
