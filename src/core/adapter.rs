//! Remote service adapter: one HTTP call, classified failures, no retries

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::core::config::AppConfig;
use crate::core::errors::{AdapterError, Result};
use crate::core::models::{Auth, Endpoint, RequestStyle};

/// A remote endpoint caller
///
/// Implementations issue exactly one request per call and leave retry and
/// fallback policy to the caller.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Send `payload` to `endpoint`, attaching `credential` the way the endpoint expects
    async fn call(&self, endpoint: &Endpoint, payload: &Value, credential: Option<&str>) -> Result<Value>;
}

/// reqwest-backed adapter
#[derive(Debug, Clone)]
pub struct HttpAdapter {
    client: reqwest::Client,
}

impl HttpAdapter {
    /// Create an adapter whose requests are bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self::with_client(client))
    }

    /// Adapter using the configured request timeout
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(Duration::from_millis(config.timeout_ms))
    }

    /// Wrap an already configured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Flatten a JSON object into query parameters
fn query_pairs(payload: &Value) -> Vec<(String, String)> {
    payload
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(k, v)| {
                    let value = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), value)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl RemoteService for HttpAdapter {
    async fn call(&self, endpoint: &Endpoint, payload: &Value, credential: Option<&str>) -> Result<Value> {
        let mut request = match endpoint.style {
            RequestStyle::JsonBody => self.client.post(&endpoint.url).json(payload),
            RequestStyle::Query => self.client.get(&endpoint.url).query(&query_pairs(payload)),
        };

        match (endpoint.auth, credential) {
            (Auth::HuggingFaceBearer, Some(token)) => request = request.bearer_auth(token),
            (Auth::GoogleApiKey, Some(key)) => request = request.query(&[("key", key)]),
            _ => {}
        }

        debug!("Calling {} ({})", endpoint.name, endpoint.url);

        let response = request.send().await.map_err(|e| AdapterError::NetworkError {
            message: e.to_string(),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AdapterError::NetworkError {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(AdapterError::from_status(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| AdapterError::InvalidResponse {
            message: format!("{}: {}", endpoint.name, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::EndpointKind;
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/ok", post(|| async { Json(json!([{ "translation_text": "こんにちは" }])) }))
            .route("/unauthorized", post(|| async { (StatusCode::UNAUTHORIZED, "Invalid token") }))
            .route("/missing", post(|| async { (StatusCode::NOT_FOUND, "Model not found") }))
            .route("/broken", post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "Model is loading") }))
            .route("/not-json", post(|| async { "plain text" }))
            .route(
                "/slow",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!([{ "translation_text": "遅い" }]))
                }),
            )
            .route(
                "/echo-auth",
                post(|headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({ "authorization": auth }))
                }),
            )
            .route(
                "/echo-query",
                get(|Query(params): Query<HashMap<String, String>>| async move { Json(json!(params)) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn endpoint(base: &str, path: &str, auth: Auth) -> Endpoint {
        Endpoint::new(path, format!("{}{}", base, path), EndpointKind::HfTranslation, auth)
    }

    fn adapter() -> HttpAdapter {
        adapter_with_timeout(Duration::from_secs(5))
    }

    fn adapter_with_timeout(timeout: Duration) -> HttpAdapter {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap();
        HttpAdapter::with_client(client)
    }

    #[test]
    fn test_from_config_builds_client() {
        assert!(HttpAdapter::from_config(&AppConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_success_returns_json() {
        let base = spawn_upstream().await;
        let value = adapter()
            .call(&endpoint(&base, "/ok", Auth::None), &json!({ "inputs": "Hello" }), None)
            .await
            .unwrap();
        assert_eq!(value[0]["translation_text"], "こんにちは");
    }

    #[tokio::test]
    async fn test_status_classification() {
        let base = spawn_upstream().await;
        let adapter = adapter();
        let payload = json!({ "inputs": "Hello" });

        let err = adapter
            .call(&endpoint(&base, "/unauthorized", Auth::None), &payload, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AdapterError::Unauthorized { status: 401, body: "Invalid token".to_string() }
        );

        let err = adapter
            .call(&endpoint(&base, "/missing", Auth::None), &payload, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::NotFound { status: 404, .. }));

        let err = adapter
            .call(&endpoint(&base, "/broken", Auth::None), &payload, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::ServiceError { status: 503, ref body } if body == "Model is loading"));

        let err = adapter
            .call(&endpoint(&base, "/not-json", Auth::None), &payload, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let unreachable = Endpoint::new("dead", "http://127.0.0.1:1/models/x", EndpointKind::HfTranslation, Auth::None);
        let err = adapter().call(&unreachable, &json!({}), None).await.unwrap_err();
        assert!(matches!(err, AdapterError::NetworkError { .. }));
    }

    #[tokio::test]
    async fn test_hanging_upstream_times_out() {
        let base = spawn_upstream().await;
        let err = adapter_with_timeout(Duration::from_millis(100))
            .call(&endpoint(&base, "/slow", Auth::None), &json!({ "inputs": "Hello" }), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::NetworkError { .. }));
    }

    #[tokio::test]
    async fn test_bearer_credential_attached() {
        let base = spawn_upstream().await;
        let value = adapter()
            .call(
                &endpoint(&base, "/echo-auth", Auth::HuggingFaceBearer),
                &json!({ "inputs": "Hello" }),
                Some("hf_secret"),
            )
            .await
            .unwrap();
        assert_eq!(value["authorization"], "Bearer hf_secret");
    }

    #[tokio::test]
    async fn test_query_style_with_api_key() {
        let base = spawn_upstream().await;
        let ep = endpoint(&base, "/echo-query", Auth::GoogleApiKey).with_style(RequestStyle::Query);
        let value = adapter()
            .call(&ep, &json!({ "q": "Hello", "sl": "en" }), Some("g_key"))
            .await
            .unwrap();
        assert_eq!(value["q"], "Hello");
        assert_eq!(value["sl"], "en");
        assert_eq!(value["key"], "g_key");
    }
}
