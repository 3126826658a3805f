//! `HttpClient` backed by reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpRequest, HttpResponse},
};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("gallery-core/", env!("CARGO_PKG_VERSION"));

/// Pooled reqwest client
///
/// One instance is shared by every detail fetch of a search, so the pool
/// keeps enough idle connections per host for a full fan-out. Every request
/// is sent exactly once.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_max_idle_per_host(32)
            .user_agent(USER_AGENT)
            .build()
            .map(Self::with_client)
            .map_err(|e| BridgeError::NotAvailable(format!("Cannot build HTTP client: {}", e)))
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn prepare(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let builder = request
            .headers
            .iter()
            .fold(self.client.get(&request.url), |builder, (key, value)| {
                builder.header(key.as_str(), value.as_str())
            });

        match request.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    async fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(url = %request.url, "Sending HTTP request");
        let response = self.prepare(request).send().await.map_err(transport_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(e: reqwest::Error) -> BridgeError {
    if e.is_timeout() {
        BridgeError::OperationFailed("Request timed out".to_string())
    } else if e.is_connect() {
        BridgeError::OperationFailed(format!("Connection failed: {}", e))
    } else {
        BridgeError::OperationFailed(e.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.send_once(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_client_keeps_request_defaults() {
        let client = ReqwestHttpClient::with_client(Client::new());
        let built = client
            .prepare(&HttpRequest::get("http://catalog.test/v1/search?q=Monet"))
            .build()
            .unwrap();

        assert_eq!(built.url().query(), Some("q=Monet"));
        assert_eq!(built.timeout(), None);
        assert!(built.headers().get("Accept").is_none());
    }

    #[test]
    fn test_prepare_applies_headers_and_timeout() {
        let client = ReqwestHttpClient::new().unwrap();
        let request = HttpRequest::get("http://catalog.test/v1/objects/1")
            .accept_json()
            .timeout(Duration::from_secs(2));

        let built = client.prepare(&request).build().unwrap();

        assert_eq!(built.method(), reqwest::Method::GET);
        assert_eq!(built.url().as_str(), "http://catalog.test/v1/objects/1");
        assert_eq!(
            built.headers().get("Accept").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(built.timeout(), Some(&Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = ReqwestHttpClient::with_timeout(Duration::from_millis(500)).unwrap();
        // Nothing listens on the loopback discard port
        let result = client
            .execute(HttpRequest::get("http://127.0.0.1:9/search"))
            .await;

        assert!(matches!(result, Err(BridgeError::OperationFailed(_))));
    }
}
