//! HTTP client built on reqwest.
//!
//! # Responsibilities
//! - Build a reqwest client from `ClientConfig` (user agent, timeouts)
//! - Fetch resources relative to the endpoint address
//! - Hand buffered responses to the decoding pipeline

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::client::endpoint::Endpoint;
use crate::config::ClientConfig;
use crate::decoding::reader::ResponseDecoder;
use crate::decoding::registry::DecoderRegistry;
use crate::decoding::types::DecodeError;
use crate::http::response::{RawResponse, TypedResponse};
use crate::http::transport;

/// Errors raised by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport, timeout or DNS failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
    endpoint: Endpoint,
}

impl Client {
    /// Create a client for `config.endpoint`, scoped to `registry`.
    pub fn new(config: &ClientConfig, registry: Arc<DecoderRegistry>) -> ClientResult<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        let address = Url::parse(&config.endpoint)?;

        tracing::debug!(endpoint = %address, decoders = registry.len(), "HTTP client created");

        Ok(Self {
            inner,
            endpoint: Endpoint::new(address, registry),
        })
    }

    pub fn from_reqwest(inner: reqwest::Client, endpoint: Endpoint) -> Self {
        Self { inner, endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// GET `path` and return the buffered raw response.
    pub async fn fetch(&self, path: &str) -> ClientResult<RawResponse> {
        let url = self.endpoint.resolve(path)?;
        tracing::debug!(url = %url, "Fetching");

        let response = self.inner.get(url).send().await?;
        transport::from_reqwest(response).await
    }

    /// GET `path` and run it through `decoder`.
    pub async fn fetch_decoded(&self, path: &str, decoder: &ResponseDecoder) -> ClientResult<TypedResponse> {
        let raw = self.fetch(path).await?;
        Ok(decoder.decode(raw)?)
    }

    /// GET `path` and keep the body undecoded for later extraction.
    pub async fn fetch_unread(&self, path: &str) -> ClientResult<TypedResponse> {
        let raw = self.fetch(path).await?;
        Ok(TypedResponse::unread(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_config_endpoint() {
        let config = ClientConfig {
            endpoint: "http://127.0.0.1:9/base/".into(),
            ..ClientConfig::default()
        };
        let client = Client::new(&config, Arc::new(DecoderRegistry::new())).unwrap();
        assert_eq!(client.endpoint().address().as_str(), "http://127.0.0.1:9/base/");
        assert!(client.endpoint().registry().is_empty());
    }

    #[test]
    fn test_new_rejects_bad_endpoint() {
        let config = ClientConfig {
            endpoint: "not a url".into(),
            ..ClientConfig::default()
        };
        let err = Client::new(&config, Arc::new(DecoderRegistry::new())).unwrap_err();
        assert!(matches!(err, ClientError::UrlParse(_)));
    }
}
