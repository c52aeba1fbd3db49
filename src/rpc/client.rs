use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::{ de::DeserializeOwned, Deserialize, Serialize };
use serde_json::Value;

use crate::enums::Chain;
use crate::error::{ AppError, Result };

/// Shared HTTP client. No timeout unless the caller configures one.
pub fn build_http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<Value>,
}

impl<T> JsonRpcResponse<T> {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Message carried by the `error` field, if it has one.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(obj) =>
                obj
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            _ => None,
        }
    }

    /// Unwrap `result`, turning an `error` field into `AppError::Rpc`.
    pub fn into_result(self, chain: Chain, fallback_message: &str) -> Result<T> {
        if self.has_error() {
            let message = self.error_message().unwrap_or_else(|| fallback_message.to_string());
            return Err(AppError::Rpc { chain, message });
        }

        self.result.ok_or_else(|| AppError::fetch(chain, "response carried no result"))
    }
}

/// Minimal JSON-RPC 2.0 client over HTTP POST.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    client: reqwest::Client,
    url: String,
    chain: Chain,
}

impl JsonRpcClient {
    pub fn new(client: reqwest::Client, url: &str, chain: Chain) -> Self {
        Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            chain,
        }
    }

    /// Send one request. Transport failures and non-success statuses are
    /// `AppError::Fetch`; protocol errors are left in the envelope.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>
    ) -> Result<JsonRpcResponse<T>> {
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        tracing::debug!(chain = %self.chain, method, url = %self.url, "JSON-RPC request");

        let resp = self.client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send().await
            .map_err(|e| AppError::fetch(self.chain, format!("{} request failed: {}", method, e)))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(self.chain, format!("{} returned HTTP {}", method, resp.status())));
        }

        resp.json().await.map_err(|e|
            AppError::fetch(self.chain, format!("Failed to parse {} response: {}", method, e))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{ body_json, header, method };
    use wiremock::{ Mock, MockServer, ResponseTemplate };

    #[test]
    fn test_error_message_variants() {
        let resp: JsonRpcResponse<Value> = serde_json::from_value(
            json!({"error": {"code": -32602, "message": "Invalid param"}})
        ).unwrap();
        assert_eq!(resp.error_message().as_deref(), Some("Invalid param"));

        let resp: JsonRpcResponse<Value> = serde_json::from_value(json!({"error": {"code": -32602}})).unwrap();
        assert!(resp.has_error());
        assert_eq!(resp.error_message(), None);

        let resp: JsonRpcResponse<Value> = serde_json::from_value(json!({"result": "0x1", "error": null})).unwrap();
        assert!(!resp.has_error());
    }

    #[test]
    fn test_into_result_falls_back_to_default_message() {
        let resp: JsonRpcResponse<Value> = serde_json::from_value(json!({"error": {}})).unwrap();
        let err = resp.into_result(Chain::Solana, "Invalid Solana address").unwrap_err();

        assert!(
            matches!(err, AppError::Rpc { chain: Chain::Solana, ref message } if message == "Invalid Solana address")
        );
    }

    #[test]
    fn test_into_result_without_result_is_fetch_error() {
        let resp: JsonRpcResponse<Value> = serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1})).unwrap();
        assert!(matches!(resp.into_result(Chain::Ethereum, ""), Err(AppError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_call_omits_missing_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("accept", "application/json"))
            .and(body_json(json!({"jsonrpc": "2.0", "id": 1, "method": "getHealth"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": "ok"})))
            .expect(1)
            .mount(&server).await;

        let client = JsonRpcClient::new(reqwest::Client::new(), &server.uri(), Chain::Solana);
        let resp: JsonRpcResponse<String> = client.call("getHealth", None).await.unwrap();

        assert_eq!(resp.result.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_call_maps_http_failure_to_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server).await;

        let client = JsonRpcClient::new(reqwest::Client::new(), &server.uri(), Chain::Ethereum);
        let err = client.call::<Value>("eth_blockNumber", Some(json!([]))).await.unwrap_err();

        assert!(matches!(err, AppError::Fetch { chain: Chain::Ethereum, .. }));
    }

    #[tokio::test]
    async fn test_call_times_out_as_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"}))
                    .set_delay(Duration::from_millis(500))
            )
            .mount(&server).await;

        let http = build_http_client(Some(Duration::from_millis(50))).unwrap();
        let client = JsonRpcClient::new(http, &server.uri(), Chain::Ethereum);
        let err = client.call::<Value>("eth_blockNumber", Some(json!([]))).await.unwrap_err();

        assert!(matches!(err, AppError::Fetch { chain: Chain::Ethereum, ref reason } if reason.contains("eth_blockNumber")));
    }
}
