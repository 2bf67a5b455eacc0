//! DNS-01 authenticator
//!
//! Adapts the ACME client's per-domain challenges into TXT record
//! operations. Record clients are obtained through a
//! [`TxtRecordClientFactory`], which is also the seam tests use to swap in
//! a fake client without touching network code.
//!
//! ## Flow
//!
//! ```text
//! perform(challenges)                       cleanup(challenges)
//!   for each challenge:                       for each provisioned challenge:
//!     load credentials file                     load credentials file
//!     factory.create(settings)                  factory.create(settings)
//!     add_txt_record(domain, fqdn, token)       del_txt_record(domain, fqdn, token)
//!     remember challenge                        log (never raise) failures
//! ```

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{AuthenticatorConfig, GatewaySettings};
use crate::error::Result;
use crate::traits::{Authenticator, Challenge, TxtRecordClient, TxtRecordClientFactory};

/// Authenticator that provisions challenge records through a record client
pub struct DnsAuthenticator {
    /// Credentials path and propagation delay
    config: AuthenticatorConfig,

    /// Builds one record client per challenge
    client_factory: Box<dyn TxtRecordClientFactory>,

    /// Challenges whose record was created and not yet cleaned up
    provisioned: HashSet<Challenge>,
}

impl DnsAuthenticator {
    /// Create a new authenticator
    ///
    /// # Errors
    ///
    /// Returns a credentials error if the configuration is invalid.
    pub fn new(
        config: AuthenticatorConfig,
        client_factory: Box<dyn TxtRecordClientFactory>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            client_factory,
            provisioned: HashSet::new(),
        })
    }

    /// How long the caller should wait for DNS propagation after `perform`
    pub fn propagation_delay(&self) -> Duration {
        self.config.propagation_delay
    }

    /// Mark challenges as provisioned by an earlier process
    ///
    /// Hook-based ACME clients run the auth and cleanup steps in separate
    /// processes; the cleanup process uses this to adopt the records the
    /// auth process created.
    pub fn assume_provisioned(&mut self, challenges: &[Challenge]) {
        self.provisioned.extend(challenges.iter().cloned());
    }

    /// Whether a record for this challenge is awaiting cleanup
    pub fn is_provisioned(&self, challenge: &Challenge) -> bool {
        self.provisioned.contains(challenge)
    }

    /// Read the credentials file and build a record client from it
    async fn get_gateway_client(&self) -> Result<Box<dyn TxtRecordClient>> {
        let settings = GatewaySettings::load(&self.config.credentials_path).await?;
        self.client_factory.create(&settings)
    }
}

impl std::fmt::Debug for DnsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsAuthenticator")
            .field("config", &self.config)
            .field("provisioned", &self.provisioned.len())
            .finish()
    }
}

#[async_trait]
impl Authenticator for DnsAuthenticator {
    async fn perform(&mut self, challenges: &[Challenge]) -> Result<()> {
        for challenge in challenges {
            let client = self.get_gateway_client().await?;
            let record_name = challenge.validation_name();

            tracing::info!(
                "Provisioning TXT record {} for {} via {}",
                record_name,
                challenge.domain,
                client.client_name()
            );

            client
                .add_txt_record(challenge.base_domain(), &record_name, &challenge.validation)
                .await?;

            self.provisioned.insert(challenge.clone());
        }

        Ok(())
    }

    async fn cleanup(&mut self, challenges: &[Challenge]) -> Result<()> {
        for challenge in challenges {
            if !self.provisioned.remove(challenge) {
                tracing::debug!(
                    "Skipping cleanup for {}: no record was provisioned",
                    challenge.domain
                );
                continue;
            }

            let record_name = challenge.validation_name();
            let result = match self.get_gateway_client().await {
                Ok(client) => {
                    client
                        .del_txt_record(challenge.base_domain(), &record_name, &challenge.validation)
                        .await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => tracing::info!("Removed TXT record {}", record_name),
                Err(e) => tracing::warn!(
                    "Failed to remove TXT record {} (continuing cleanup): {}",
                    record_name,
                    e
                ),
            }
        }

        Ok(())
    }
}
