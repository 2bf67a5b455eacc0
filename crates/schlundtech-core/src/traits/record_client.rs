// # TXT Record Client Trait
//
// Defines the interface for provisioning DNS-01 challenge records.
//
// ## Usage
//
// ```rust,ignore
// use schlundtech_core::TxtRecordClient;
//
// async fn provision(client: &dyn TxtRecordClient) -> schlundtech_core::Result<()> {
//     client
//         .add_txt_record("example.com", "_acme-challenge.example.com", "token")
//         .await?;
//     client
//         .del_txt_record("example.com", "_acme-challenge.example.com", "token")
//         .await
// }
// ```

use async_trait::async_trait;

use crate::config::GatewaySettings;

/// Trait for clients that add and remove TXT records
///
/// # Single-shot
///
/// Each call performs its own zone lookup and mutation. Implementations
/// keep no state between calls beyond their immutable credentials, and
/// never retry: a failed add or remove is surfaced immediately.
#[async_trait]
pub trait TxtRecordClient: Send + Sync {
    /// Create a TXT record
    ///
    /// # Parameters
    ///
    /// - `domain`: The zone the record belongs to (e.g., "example.com")
    /// - `record_name`: The record FQDN (e.g., "_acme-challenge.example.com")
    /// - `content`: The TXT record value
    ///
    /// # Errors
    ///
    /// - [`crate::Error::DomainNotFound`] if the zone cannot be resolved
    /// - [`crate::Error::AlreadyExists`] if a record with the same name exists
    /// - [`crate::Error::Gateway`] if the gateway rejects the update
    async fn add_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        content: &str,
    ) -> Result<(), crate::Error>;

    /// Remove a TXT record
    ///
    /// The record does not need to exist beforehand.
    async fn del_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        content: &str,
    ) -> Result<(), crate::Error>;

    /// Get the client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

/// Helper trait for constructing record clients from gateway settings
pub trait TxtRecordClientFactory: Send + Sync {
    /// Create a TxtRecordClient instance
    ///
    /// # Parameters
    ///
    /// - `settings`: Credentials, TTL and endpoint read from the credentials file
    fn create(
        &self,
        settings: &GatewaySettings,
    ) -> Result<Box<dyn TxtRecordClient>, crate::Error>;
}
