// # HTTPS Transport
//
// Posts encoded request documents to the gateway endpoint and returns the
// raw response body. Only HTTP-level failures are handled here; gateway
// status codes live inside the XML and are interpreted by the client.

use async_trait::async_trait;
use schlundtech_core::traits::Transport;
use schlundtech_core::{Error, Result};
use std::time::Duration;

use crate::OP_TRANSPORT;

/// Default HTTP timeout for gateway requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Content type of every gateway request
pub const CONTENT_TYPE_XML: &str = "text/xml; charset=utf-8";

/// reqwest-backed transport for the XML gateway
#[derive(Debug, Clone)]
pub struct HttpsTransport {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpsTransport {
    /// Create a transport for `endpoint` with the default timeout
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a transport for `endpoint` with an explicit timeout
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(Error::invalid_input("Gateway endpoint cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("schlundtech-dns/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::gateway(OP_TRANSPORT, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            timeout,
            client,
        })
    }

    /// The URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpsTransport {
    async fn send(&self, request: Vec<u8>) -> Result<Vec<u8>> {
        tracing::debug!("POST {} ({} bytes)", self.endpoint, request.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE_XML)
            .body(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::gateway(
                        OP_TRANSPORT,
                        format!("Request timed out after {}s", self.timeout.as_secs_f64()),
                    )
                } else {
                    Error::gateway(OP_TRANSPORT, format!("HTTP request failed: {}", e))
                }
            })?;

        // Handle specific HTTP status codes
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return match status.as_u16() {
                401 | 403 => Err(Error::gateway(
                    OP_TRANSPORT,
                    format!("Access denied by gateway endpoint. Status: {}", status),
                )),
                429 => Err(Error::gateway(
                    OP_TRANSPORT,
                    format!("Rate limit exceeded. Please retry later. Status: {}", status),
                )),
                500..=599 => Err(Error::gateway(
                    OP_TRANSPORT,
                    format!("Gateway server error (transient): {} - {}", status, error_text),
                )),
                _ => Err(Error::gateway(
                    OP_TRANSPORT,
                    format!("Unexpected HTTP status: {} - {}", status, error_text),
                )),
            };
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::gateway(OP_TRANSPORT, format!("Failed to read response body: {}", e)))?;

        tracing::debug!("Received {} bytes from gateway", body.len());
        Ok(body.to_vec())
    }
}
