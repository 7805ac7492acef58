//! Async execution of `HttpRequest` values.
//!
//! `Transport` is the seam between the sans-IO client and the network. The
//! async `PetfinderApi` is generic over it so tests can count and script
//! round-trips without a socket.

use async_trait::async_trait;
use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// A request that never produced a response.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request. Non-2xx statuses are returned as data, not as
    /// errors; only transport-level failures are `Err`.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "transport")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "transport")]
mod reqwest_transport {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::{Client, Method};
    use tracing::debug;

    use super::{Transport, TransportError};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// `Transport` backed by a shared `reqwest::Client`.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        pub fn new(timeout: Duration) -> Result<Self, TransportError> {
            let client = Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| TransportError(e.to_string()))?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let method = match request.method {
                HttpMethod::Get => Method::GET,
                HttpMethod::Post => Method::POST,
            };
            debug!(%method, url = %request.url, "sending HTTP request");

            let mut builder = self.client.request(method, request.url.as_str());
            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| TransportError(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
                .collect();
            let body = response.text().await.map_err(|e| TransportError(e.to_string()))?;
            debug!(status, bytes = body.len(), "received HTTP response");

            Ok(HttpResponse { status, headers, body })
        }
    }
}
