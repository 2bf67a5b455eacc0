// # Transport Trait
//
// The single network boundary of the gateway client.
//
// ## Implementations
//
// - HTTPS: `schlundtech_gateway::HttpsTransport`
// - Tests: in-memory transports that replay canned XML responses

use async_trait::async_trait;

/// Trait for delivering encoded gateway requests
///
/// A transport moves bytes and nothing else: it does not inspect the XML,
/// does not interpret gateway status codes and never retries.
///
/// # Errors
///
/// Connection failures, timeouts and non-2xx responses must be reported as
/// [`crate::Error::Gateway`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one encoded XML request and return the raw XML response body
    async fn send(&self, request: Vec<u8>) -> Result<Vec<u8>, crate::Error>;
}
