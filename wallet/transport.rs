// Chain transport - sends JSON-RPC payloads to a Harmony node
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::sync::Arc;

use crate::error::ConnectorError;
use crate::provider::payload::{RpcPayload, RpcResponse};

/// The object that actually talks to the node.
///
/// An RPC error object in the node's answer is returned as a response, not as
/// an `Err`; only failures to deliver or decode are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    fn url(&self) -> &str;

    async fn send(&self, payload: &RpcPayload) -> Result<RpcResponse, ConnectorError>;
}

/// Builds transports for endpoint urls.
pub trait TransportFactory: Send + Sync {
    fn connect(&self, url: &str) -> Result<Arc<dyn Transport>, ConnectorError>;
}

pub struct HttpTransport {
    url: String,
    http_client: Arc<HttpClient>,
}

impl HttpTransport {
    pub fn new(url: &str) -> Result<Self, ConnectorError> {
        url::Url::parse(url)?;

        Ok(Self {
            url: url.to_string(),
            http_client: Arc::new(HttpClient::new()),
        })
    }

    pub fn with_client(url: &str, http_client: Arc<HttpClient>) -> Result<Self, ConnectorError> {
        url::Url::parse(url)?;

        Ok(Self {
            url: url.to_string(),
            http_client,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self, payload: &RpcPayload) -> Result<RpcResponse, ConnectorError> {
        tracing::debug!(url = %self.url, method = %payload.method, "sending rpc payload");

        let response = self.http_client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ConnectorError::Transport(format!("RPC request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ConnectorError::Transport(format!("RPC error: {}", response.status())));
        }

        response.json::<RpcResponse>().await
            .map_err(|e| ConnectorError::Transport(format!("Failed to parse response: {}", e)))
    }
}

/// Shares one HTTP client across every transport it builds.
#[derive(Default)]
pub struct HttpTransportFactory {
    http_client: Arc<HttpClient>,
}

impl HttpTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransportFactory for HttpTransportFactory {
    fn connect(&self, url: &str) -> Result<Arc<dyn Transport>, ConnectorError> {
        Ok(Arc::new(HttpTransport::with_client(url, Arc::clone(&self.http_client))?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_keeps_url() {
        let transport = HttpTransport::new("https://api.s0.t.hmny.io").unwrap();
        assert_eq!(transport.url(), "https://api.s0.t.hmny.io");
    }

    #[test]
    fn test_http_transport_rejects_bad_url() {
        assert!(matches!(
            HttpTransport::new("api.s0.t.hmny.io"),
            Err(ConnectorError::Config(_))
        ));
    }

    #[test]
    fn test_factory_connects() {
        let factory = HttpTransportFactory::new();
        let transport = factory.connect("http://localhost:9500").unwrap();
        assert_eq!(transport.url(), "http://localhost:9500");
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let transport = HttpTransport::new("http://127.0.0.1:1").unwrap();
        let payload = RpcPayload::new("hmy_blockNumber", vec![]);

        let result = transport.send(&payload).await;
        assert!(matches!(result, Err(ConnectorError::Transport(_))));
    }
}
